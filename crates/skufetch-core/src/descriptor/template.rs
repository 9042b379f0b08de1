//! Catalog URL template: `{base_url}{identifier}` with a static cookie.

use std::collections::BTreeMap;

use super::{ParseError, ParseMode, RequestDescriptor, COOKIE_HEADER};

/// Build a descriptor for a bare identifier. Blank identifiers are skipped.
/// Under [`ParseMode::RequireCookie`] a missing cookie is a
/// [`ParseError::MissingField`], as for command lines.
pub fn from_identifier(
    sequence_number: u64,
    base_url: &str,
    identifier: &str,
    cookie: Option<&str>,
    mode: ParseMode,
) -> Result<Option<RequestDescriptor>, ParseError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }
    if base_url.is_empty() {
        return Err(ParseError::MissingField("base_url"));
    }
    let mut headers = BTreeMap::new();
    match (cookie, mode) {
        (Some(cookie), _) => {
            headers.insert(COOKIE_HEADER.to_string(), cookie.to_string());
        }
        (None, ParseMode::RequireCookie) => return Err(ParseError::MissingField("Cookie header")),
        (None, ParseMode::UrlOnly) => {}
    }
    Ok(Some(RequestDescriptor::new(
        sequence_number,
        format!("{}{}", base_url, identifier),
        headers,
    )))
}

/// Render the curl command line for an identifier, in the form `parse` reads back.
pub fn render_command(base_url: &str, identifier: &str, cookie: Option<&str>) -> String {
    let mut cmd = format!(
        "curl --location --request GET '{}{}'",
        base_url,
        identifier.trim()
    );
    if let Some(cookie) = cookie {
        cmd.push_str(&format!(" --header '{}: {}'", COOKIE_HEADER, cookie));
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse;

    const BASE: &str = "https://store.example.com/_v/catalog/";

    #[test]
    fn identifier_joins_base_url() {
        let d = from_identifier(4, BASE, " 100234 ", Some("sid=1"), ParseMode::RequireCookie)
            .unwrap()
            .unwrap();
        assert_eq!(d.sequence_number(), 4);
        assert_eq!(d.target_url(), "https://store.example.com/_v/catalog/100234");
        assert_eq!(d.headers().get(COOKIE_HEADER).map(String::as_str), Some("sid=1"));
    }

    #[test]
    fn identifier_without_cookie_has_no_headers() {
        let d = from_identifier(1, BASE, "7", None, ParseMode::UrlOnly)
            .unwrap()
            .unwrap();
        assert!(d.headers().is_empty());
    }

    #[test]
    fn identifier_without_cookie_rejected_when_required() {
        assert_eq!(
            from_identifier(1, BASE, "7", None, ParseMode::RequireCookie),
            Err(ParseError::MissingField("Cookie header"))
        );
    }

    #[test]
    fn blank_identifier_skipped() {
        assert_eq!(from_identifier(1, BASE, "  ", None, ParseMode::RequireCookie), Ok(None));
    }

    #[test]
    fn identifier_requires_base_url() {
        assert_eq!(
            from_identifier(1, "", "7", None, ParseMode::UrlOnly),
            Err(ParseError::MissingField("base_url"))
        );
    }

    #[test]
    fn rendered_command_parses_back() {
        let cmd = render_command(BASE, "100234", Some("janus_sid=7dec"));
        assert_eq!(
            cmd,
            "curl --location --request GET 'https://store.example.com/_v/catalog/100234' --header 'Cookie: janus_sid=7dec'"
        );
        let d = parse(1, &cmd, ParseMode::RequireCookie).unwrap().unwrap();
        let expected = from_identifier(
            1,
            BASE,
            "100234",
            Some("janus_sid=7dec"),
            ParseMode::RequireCookie,
        )
        .unwrap()
        .unwrap();
        assert_eq!(d, expected);
    }
}
