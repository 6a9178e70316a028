//! Title derivation from a selection
//!
//! The title is the first line of the selection with wikilinks collapsed to
//! their display text:
//! - `[[note]]` becomes `note`
//! - `[[note|label]]` becomes `label`

use regex::Regex;
use std::sync::LazyLock;

static PLAIN_WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]*)\]\]").expect("plain wikilink regex"));

static LABELED_WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]]*\|([^\]]*)\]\]").expect("labeled wikilink regex"));

/// Collapse the wikilinks on the first line of `text`
///
/// Returns an empty string when the first line is empty. Malformed links are
/// left to whichever pattern matches first.
pub fn parse_title(text: &str) -> String {
    let first_line = text.split('\n').next().unwrap_or_default();
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);

    let unwrapped = PLAIN_WIKILINK_REGEX.replace_all(first_line, "$1");
    LABELED_WIKILINK_REGEX
        .replace_all(&unwrapped, "$1")
        .into_owned()
}

/// Title of a raw selection, or `None` when it has no usable title
pub fn derive_title(selection: &str) -> Option<String> {
    let title = parse_title(selection.trim());
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_first_line() {
        assert_eq!(parse_title("My Title\nbody text"), "My Title");
    }

    #[test]
    fn test_unwrap_plain_link() {
        assert_eq!(parse_title("[[Foo Bar]]\nrest"), "Foo Bar");
    }

    #[test]
    fn test_unwrap_labeled_link() {
        assert_eq!(parse_title("[[Foo|Bar Baz]]\nrest"), "Bar Baz");
    }

    #[test]
    fn test_multiple_links_on_one_line() {
        assert_eq!(
            parse_title("See [[Alpha]] and [[beta-note|Beta]] then [[Gamma]]"),
            "See Alpha and Beta then Gamma"
        );
    }

    #[test]
    fn test_links_on_later_lines_are_ignored() {
        assert_eq!(parse_title("Heading\n[[Other|x]]"), "Heading");
    }

    #[test]
    fn test_no_link_syntax_left_for_well_formed_links() {
        let inputs = [
            "[[a]]",
            "[[a|b]]",
            "x [[a]] y [[b|c]] z",
            "[[2024 Planning]]: notes",
            "[[|empty target]]",
            "[[]]",
        ];
        for input in inputs {
            let title = parse_title(input);
            assert!(!title.contains("[["), "{input} -> {title}");
            assert!(!title.contains("]]"), "{input} -> {title}");
        }
    }

    #[test]
    fn test_label_containing_pipe_keeps_first_match() {
        // `[^\]]*` is greedy up to the last `|`, so the label is the final segment
        assert_eq!(parse_title("[[a|b|c]]"), "c");
    }

    #[test]
    fn test_crlf_first_line() {
        assert_eq!(parse_title("Windows\r\nline"), "Windows");
    }

    #[test]
    fn test_empty_selection_has_no_title() {
        assert_eq!(parse_title(""), "");
        assert_eq!(derive_title(""), None);
        assert_eq!(derive_title("   \n\t "), None);
    }

    #[test]
    fn test_empty_link_has_no_title() {
        assert_eq!(derive_title("[[]]"), None);
    }

    #[test]
    fn test_derive_title_trims_selection() {
        assert_eq!(derive_title("\n\n  Leading blank lines\nmore"), Some("Leading blank lines".to_string()));
    }
}
