//! Parse-and-verify work item
//!
//! One invocation parses the shared sample document with the selected
//! engine and checks that the first `<title>` contains the expected text.
//! The check keeps the optimizer from discarding the parse and catches an
//! engine that silently returns an empty tree.

use std::sync::Arc;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use scraper::{Html, Selector};

use super::parser_engine::ParserEngine;
use super::work_item::WorkItem;
use crate::document::Document;
use crate::utils::{BenchError, Result, WorkError};

/// Title fragment expected in the default sample page
pub const DEFAULT_EXPECTED_TITLE: &str = "reddit";

/// Parse the shared document and verify its title
pub struct ParseAndVerify {
    engine: ParserEngine,
    document: Arc<Document>,
    expected_title: String,
    label: String,
    title_selector: Selector,
}

impl ParseAndVerify {
    /// Create a work item for `engine` over `document`
    pub fn new(
        engine: ParserEngine,
        document: Arc<Document>,
        expected_title: impl Into<String>,
    ) -> Result<Self> {
        let expected_title = expected_title.into();
        if expected_title.is_empty() {
            return Err(BenchError::Config(
                "expected title must not be empty".to_string(),
            ));
        }

        let title_selector = Selector::parse("title")
            .map_err(|e| BenchError::Config(format!("invalid title selector: {:?}", e)))?;

        Ok(Self {
            engine,
            document,
            expected_title,
            label: format!("parse-{}", engine),
            title_selector,
        })
    }

    fn title(&self) -> std::result::Result<Option<String>, WorkError> {
        title_with(self.engine, self.document.text(), &self.title_selector)
    }
}

impl WorkItem for ParseAndVerify {
    fn name(&self) -> &str {
        &self.label
    }

    fn execute(&self) -> std::result::Result<(), WorkError> {
        match self.title()? {
            Some(title) if title.contains(&self.expected_title) => Ok(()),
            Some(title) => Err(WorkError::Verification(format!(
                "title {:?} does not contain {:?}",
                title.trim(),
                self.expected_title
            ))),
            None => Err(WorkError::Verification(
                "document has no <title> element".to_string(),
            )),
        }
    }
}

/// Extract the first `<title>` text with `engine`
pub fn extract_title(
    engine: ParserEngine,
    html: &str,
) -> std::result::Result<Option<String>, WorkError> {
    let selector = Selector::parse("title")
        .map_err(|e| WorkError::Parse(format!("invalid title selector: {:?}", e)))?;
    title_with(engine, html, &selector)
}

fn title_with(
    engine: ParserEngine,
    html: &str,
    selector: &Selector,
) -> std::result::Result<Option<String>, WorkError> {
    match engine {
        ParserEngine::Html5ever => Ok(html5ever_title(html)),
        ParserEngine::Scraper => Ok(scraper_title(html, selector)),
        ParserEngine::Tl => tl_title(html),
    }
}

fn html5ever_title(html: &str) -> Option<String> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    find_title(&dom.document)
}

/// Depth-first search for the first title element
fn find_title(handle: &Handle) -> Option<String> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if &*name.local == "title" {
            let mut text = String::new();
            for child in handle.children.borrow().iter() {
                if let NodeData::Text { ref contents } = child.data {
                    text.push_str(&contents.borrow());
                }
            }
            return Some(text);
        }
    }

    handle.children.borrow().iter().find_map(find_title)
}

fn scraper_title(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

fn tl_title(html: &str) -> std::result::Result<Option<String>, WorkError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| WorkError::Parse(format!("{:?}", e)))?;
    let parser = dom.parser();

    Ok(dom
        .query_selector("title")
        .and_then(|mut handles| handles.next())
        .and_then(|handle| handle.get(parser))
        .map(|node| node.inner_text(parser).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!doctype html>
<html>
<head>
    <title>reddit: the front page of the internet</title>
    <meta charset="utf-8" />
</head>
<body><div><p>hello</p></div></body>
</html>
"#;

    fn item(engine: ParserEngine, html: &str, expected: &str) -> ParseAndVerify {
        let document = Arc::new(Document::from_bytes(html.as_bytes().to_vec(), "inline").unwrap());
        ParseAndVerify::new(engine, document, expected).unwrap()
    }

    #[test]
    fn test_every_engine_finds_title() {
        for engine in ParserEngine::all() {
            let title = extract_title(engine, SAMPLE).unwrap();
            assert_eq!(
                title.as_deref(),
                Some("reddit: the front page of the internet"),
                "engine {}",
                engine
            );
        }
    }

    #[test]
    fn test_every_engine_verifies() {
        for engine in ParserEngine::all() {
            let work = item(engine, SAMPLE, DEFAULT_EXPECTED_TITLE);
            assert_eq!(work.execute(), Ok(()), "engine {}", engine);
            assert_eq!(work.name(), format!("parse-{}", engine));
        }
    }

    #[test]
    fn test_wrong_title_fails_verification() {
        for engine in ParserEngine::all() {
            let work = item(engine, SAMPLE, "hacker news");
            assert!(
                matches!(work.execute(), Err(WorkError::Verification(_))),
                "engine {}",
                engine
            );
        }
    }

    #[test]
    fn test_missing_title_fails_verification() {
        let html = "<html><body><p>no head here</p></body></html>";
        for engine in ParserEngine::all() {
            let work = item(engine, html, DEFAULT_EXPECTED_TITLE);
            assert!(
                matches!(work.execute(), Err(WorkError::Verification(_))),
                "engine {}",
                engine
            );
        }
    }

    #[test]
    fn test_first_title_wins() {
        let html = "<html><head><title>reddit</title></head><body><svg><title>other</title></svg></body></html>";
        for engine in ParserEngine::all() {
            assert_eq!(
                extract_title(engine, html).unwrap().as_deref(),
                Some("reddit"),
                "engine {}",
                engine
            );
        }
    }

    #[test]
    fn test_empty_expected_title_rejected() {
        let document = Arc::new(Document::from_bytes(SAMPLE.as_bytes().to_vec(), "inline").unwrap());
        assert!(ParseAndVerify::new(ParserEngine::Tl, document, "").is_err());
    }
}
