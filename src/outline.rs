use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A markdown heading found in a note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 through 6.
    pub level: u8,
    /// Heading text with surrounding whitespace removed.
    pub text: String,
    /// 0-indexed position in `content.split('\n')`.
    pub line: usize,
}

/// Collects the ATX headings of `content` in document order.
///
/// Only `#`..`######` followed by whitespace and some text count; `#tag` and
/// seven or more hashes are plain text.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    static RE_HEADING: OnceLock<Regex> = OnceLock::new();
    let re_heading =
        RE_HEADING.get_or_init(|| Regex::new(r"^(#{1,6})\s+([^\r\n]+)").unwrap());

    content
        .split('\n')
        .enumerate()
        .filter_map(|(line, text)| {
            let cap = re_heading.captures(text)?;
            let hashes = cap.get(1)?.as_str();
            let body = cap.get(2)?.as_str();
            Some(Heading {
                level: hashes.len() as u8,
                text: body.trim().to_string(),
                line,
            })
        })
        .collect()
}

/// Renders the outline panel markup. The host binds clicks through
/// `data-line`, so the class and attribute names must not change.
pub fn render_outline_html(headings: &[Heading]) -> String {
    headings
        .iter()
        .map(|heading| {
            format!(
                "<div class=\"outline-item h{}\" data-line=\"{}\">{}</div>",
                heading.level, heading.line, heading.text
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn heading(level: u8, text: &str, line: usize) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            line,
        }
    }

    #[test]
    fn extracts_every_level() {
        let headings = extract_headings("# H1\n## H2\n### H3\n#### H4\n##### H5\n###### H6");
        assert_eq!(headings.len(), 6);
        for (idx, h) in headings.iter().enumerate() {
            assert_eq!(h.level as usize, idx + 1);
            assert_eq!(h.line, idx);
            assert_eq!(h.text, format!("H{}", idx + 1));
        }
    }

    #[test]
    fn skips_body_text_and_keeps_line_numbers() {
        let content = "Some text\n# Heading 1\nMore text\n## Heading 2\nEven more text";
        assert_eq!(
            extract_headings(content),
            vec![heading(1, "Heading 1", 1), heading(2, "Heading 2", 3)]
        );
    }

    #[test]
    fn blank_lines_do_not_shift_numbering() {
        assert_eq!(
            extract_headings("# First\n\n# Second\n\n# Third"),
            vec![
                heading(1, "First", 0),
                heading(1, "Second", 2),
                heading(1, "Third", 4)
            ]
        );
    }

    #[test]
    fn trims_heading_text() {
        let headings = extract_headings("#   Heading with spaces   ");
        assert_eq!(headings[0].text, "Heading with spaces");
    }

    #[test]
    fn rejects_missing_space_and_seven_hashes() {
        assert!(extract_headings("#NoSpace").is_empty());
        assert!(extract_headings("####### Not a heading").is_empty());
        assert!(extract_headings("").is_empty());
        assert!(extract_headings("Just regular text\nwithout any headings").is_empty());
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        assert_eq!(
            extract_headings("# One\r\ntext\r\n## Two\r\n#\r\n"),
            vec![heading(1, "One", 0), heading(2, "Two", 2)]
        );
    }

    #[test]
    fn renders_outline_items() {
        let html = render_outline_html(&[heading(1, "First", 0), heading(2, "Second", 2)]);
        assert_eq!(
            html,
            "<div class=\"outline-item h1\" data-line=\"0\">First</div>\
             <div class=\"outline-item h2\" data-line=\"2\">Second</div>"
        );
        assert_eq!(render_outline_html(&[]), "");
    }

    proptest! {
        #[test]
        fn lines_are_increasing_and_point_at_the_source(
            lines in proptest::collection::vec("(#{0,8} ?)?[a-z #]{0,12}", 0..24)
        ) {
            let content = lines.join("\n");
            let split: Vec<&str> = content.split('\n').collect();
            let headings = extract_headings(&content);
            for pair in headings.windows(2) {
                prop_assert!(pair[0].line < pair[1].line);
            }
            for h in &headings {
                prop_assert!((1..=6).contains(&h.level));
                prop_assert!(split[h.line].starts_with(&"#".repeat(h.level as usize)));
            }
        }
    }
}
