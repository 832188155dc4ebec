//! HTML engines that can be benchmarked

use clap::ValueEnum;

/// Supported HTML parsing engines
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserEngine {
    /// html5ever tree builder into an RcDom
    #[default]
    Html5ever,
    /// scraper (html5ever-backed DOM with CSS selectors)
    Scraper,
    /// tl zero-copy tag-soup parser
    Tl,
}

impl ParserEngine {
    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html5ever => "html5ever",
            Self::Scraper => "scraper",
            Self::Tl => "tl",
        }
    }

    /// All engines, in report order
    pub fn all() -> [Self; 3] {
        [Self::Html5ever, Self::Scraper, Self::Tl]
    }
}

impl std::fmt::Display for ParserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
