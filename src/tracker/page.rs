//! Parsed tracker pages
//!
//! Thin wrapper over a `scraper` document with the few queries the
//! schema parsers need.

use scraper::{Html, Selector};

/// An HTML page returned by the tracker
pub struct Page {
    document: Html,
}

impl Page {
    /// Parses a response body into a page
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns true if any element matches the CSS selector
    pub fn contains(&self, css: &str) -> bool {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).next().is_some(),
            Err(_) => false,
        }
    }

    /// Returns the whitespace-trimmed text of every element matching the
    /// selector, in document order
    pub fn texts(&self, css: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };

        self.document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect()
    }

    /// Returns an attribute of the first element matching the selector
    pub fn attr(&self, css: &str, name: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;

        self.document
            .select(&selector)
            .find_map(|element| element.value().attr(name))
            .map(|value| value.to_string())
    }
}
