//! Work items benchmarked by the sweep

pub mod parse_verify;
pub mod parser_engine;
pub mod work_item;

pub use parse_verify::{extract_title, ParseAndVerify, DEFAULT_EXPECTED_TITLE};
pub use parser_engine::ParserEngine;
pub use work_item::WorkItem;
