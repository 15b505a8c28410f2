//! Plain-text and machine-key sanitizers applied to inbound definitions

use regex::Regex;
use std::sync::OnceLock;

fn script_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)\s*>").expect("valid regex")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<[a-zA-Z/!?][^>]*>").expect("valid regex"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn strip_tags(input: &str) -> String {
    let without_scripts = script_block_pattern().replace_all(input, "");
    tag_pattern().replace_all(&without_scripts, "").into_owned()
}

/// Sanitize a single-line display string.
///
/// Removes markup and control characters, folds all whitespace (including
/// line breaks and tabs) into single spaces and trims the result.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let printable: String = stripped
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();

    whitespace_pattern()
        .replace_all(&printable, " ")
        .trim()
        .to_string()
}

/// Sanitize a multi-line string. Same as [`sanitize_text_field`] but keeps
/// line breaks; trailing spaces on each line are removed.
pub fn sanitize_textarea(input: &str) -> String {
    let stripped = strip_tags(&input.replace("\r\n", "\n"));
    let lines: Vec<String> = stripped
        .split('\n')
        .map(|line| {
            line.chars()
                .map(|c| if c == '\t' { ' ' } else { c })
                .filter(|c| !c.is_control())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();

    lines.join("\n").trim().to_string()
}

/// Sanitize a machine key: lower-case ASCII letters, digits and underscores only
pub fn sanitize_key(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_strips_markup() {
        assert_eq!(sanitize_text_field("<b>Your</b> name"), "Your name");
        assert_eq!(
            sanitize_text_field("Hi<script>alert('x')</script> there"),
            "Hi there"
        );
    }

    #[test]
    fn test_text_field_collapses_whitespace() {
        assert_eq!(sanitize_text_field("  First\n\tName  "), "First Name");
        assert_eq!(sanitize_text_field("a\u{0007}b"), "ab");
    }

    #[test]
    fn test_text_field_keeps_comparison_characters() {
        assert_eq!(sanitize_text_field("5 < 6"), "5 < 6");
        assert_eq!(sanitize_text_field("a > b"), "a > b");
        assert_eq!(sanitize_text_field("x<y"), "x<y");
        assert_eq!(sanitize_text_field("<b>bold</b> x<y"), "bold x<y");
    }

    #[test]
    fn test_text_field_empty_after_sanitizing() {
        assert_eq!(sanitize_text_field("<br/>  "), "");
    }

    #[test]
    fn test_textarea_keeps_lines() {
        assert_eq!(
            sanitize_textarea("Hello\r\n\r\n<i>{{all}}</i>  \n"),
            "Hello\n\n{{all}}"
        );
    }

    #[test]
    fn test_key() {
        assert_eq!(sanitize_key("First Name"), "firstname");
        assert_eq!(sanitize_key("e-mail_2"), "email_2");
        assert_eq!(sanitize_key("Été"), "t");
        assert_eq!(sanitize_key("***"), "");
    }
}
