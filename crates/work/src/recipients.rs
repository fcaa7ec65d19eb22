//! Invitation recipients and message body.

use std::sync::OnceLock;
use regex::Regex;
use crate::error::{ActionError, Result};

fn address() -> &'static Regex {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    ADDRESS.get_or_init(|| Regex::new(r"^[^\s@,]+@[^\s@,]+\.[^\s@,]+$").expect("valid address regex"))
}

/// Split a comma-separated recipient list.
///
/// Entries are trimmed and blanks dropped. At least one address is required
/// and every entry must look like one.
pub fn parse_recipients(input: &str) -> Result<Vec<String>> {
    let recipients: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    if recipients.is_empty() {
        return Err(ActionError::invalid("recipients", "at least one recipient is required"));
    }
    if let Some(bad) = recipients.iter().find(|r| !address().is_match(r)) {
        return Err(ActionError::invalid("recipients", format!("invalid address: {}", bad)));
    }
    Ok(recipients)
}

/// Append the survey link to a message.
pub fn with_form_link(message: &str, form_url: &str) -> String {
    format!("{}\n\nSurvey link: {}", message.trim_end(), form_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipients() {
        let list = parse_recipients(" a@x.io, ,b@y.org ,").unwrap();
        assert_eq!(list, vec!["a@x.io", "b@y.org"]);

        assert!(parse_recipients(" , ").is_err());
        assert!(matches!(
            parse_recipients("a@x.io, not-an-address"),
            Err(ActionError::Invalid { field: "recipients", .. })
        ));
    }

    #[test]
    fn test_form_link() {
        assert_eq!(
            with_form_link("Hello\n", "https://forms.local/r/abc"),
            "Hello\n\nSurvey link: https://forms.local/r/abc"
        );
    }
}
