//! Request descriptors: the URL and headers of one GET, parsed from raw input lines.
//!
//! Raw lines are usually curl commands copied from a browser or generated by
//! `skufetch prepare`, e.g.
//! `curl --location --request GET 'https://host/_v/catalog/123' --header 'Cookie: sid=abc'`.
//! Only the first `http(s)://` token and an optional `Cookie:` value are used;
//! everything else on the line is ignored.

mod template;

pub use template::{from_identifier, render_command};

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const COOKIE_HEADER: &str = "Cookie";

/// Whether a command line must carry a `Cookie:` header to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    UrlOnly,
    RequireCookie,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing {0}")]
    MissingField(&'static str),
}

/// One GET to issue. `sequence_number` is the 1-based position of the source
/// record and is carried through to the outcome for correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    sequence_number: u64,
    target_url: String,
    headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(
        sequence_number: u64,
        target_url: impl Into<String>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            sequence_number,
            target_url: target_url.into(),
            headers,
        }
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s'"]+"#).expect("valid url regex"))
}

fn cookie_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)cookie:\s?([^\s'"]+)"#).expect("valid cookie regex"))
}

/// Parse a raw command line into a descriptor.
///
/// Returns `Ok(None)` for blank lines (skip, not an error). A line without a
/// URL, or without a cookie under [`ParseMode::RequireCookie`], is a
/// [`ParseError::MissingField`].
pub fn parse(
    sequence_number: u64,
    raw: &str,
    mode: ParseMode,
) -> Result<Option<RequestDescriptor>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let url = url_pattern()
        .find(raw)
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingField("url"))?;

    let cookie = cookie_pattern()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    let mut headers = BTreeMap::new();
    match (cookie, mode) {
        (Some(value), _) => {
            headers.insert(COOKIE_HEADER.to_string(), value.to_string());
        }
        (None, ParseMode::RequireCookie) => return Err(ParseError::MissingField("Cookie header")),
        (None, ParseMode::UrlOnly) => {}
    }

    Ok(Some(RequestDescriptor::new(sequence_number, url, headers)))
}
