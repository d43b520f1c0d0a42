//! Display-side segmentation of model text into prose paragraphs and fenced
//! code blocks.
//!
//! The rendering surface itself lives outside this crate; it consumes these
//! segments and decides how each kind is painted.

use regex::Regex;

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of prose, one entry per paragraph.
    Prose(Vec<String>),
    /// A fenced code block with an optional language tag.
    Code {
        language: Option<String>,
        code: String,
    },
}

/// Split model text on code fences. Even-indexed segments are prose, odd ones
/// are code; an odd number of delimiters means the final segment is an
/// unterminated fence, which stays code rather than being auto-closed.
pub fn segment_text(text: &str) -> Vec<Segment> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.split(FENCE)
        .enumerate()
        .filter_map(|(index, segment)| {
            if index % 2 == 0 {
                let paragraphs = paragraphs(segment);
                (!paragraphs.is_empty()).then_some(Segment::Prose(paragraphs))
            } else {
                Some(split_code_segment(segment))
            }
        })
        .collect()
}

/// One paragraph per run of two-or-more newlines. Single newlines inside a
/// paragraph collapse to spaces; blank paragraphs are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let breaks = Regex::new(r"\n{2,}").unwrap();
    breaks
        .split(text)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| paragraph.replace('\n', " "))
        .collect()
}

/// The first line of a code segment, up to the first newline, is an optional
/// language tag; a segment with no newline is entirely code.
fn split_code_segment(segment: &str) -> Segment {
    let trimmed = segment.trim_end_matches('\n');
    match trimmed.find('\n') {
        None => Segment::Code {
            language: None,
            code: trimmed.trim().to_string(),
        },
        Some(newline) => {
            let language = trimmed[..newline].trim();
            Segment::Code {
                language: (!language.is_empty()).then(|| language.to_string()),
                code: trimmed[newline + 1..].trim().to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(paragraphs: &[&str]) -> Segment {
        Segment::Prose(paragraphs.iter().map(|p| p.to_string()).collect())
    }

    fn code(language: Option<&str>, body: &str) -> Segment {
        Segment::Code {
            language: language.map(str::to_string),
            code: body.to_string(),
        }
    }

    #[test]
    fn test_prose_and_fenced_code() {
        let segments = segment_text("Here is code:\n\n```python\nprint(1)\n```\nDone");
        assert_eq!(
            segments,
            vec![
                prose(&["Here is code:"]),
                code(Some("python"), "print(1)"),
                prose(&["Done"]),
            ]
        );
    }

    #[test]
    fn test_paragraph_breaks_and_newline_collapse() {
        let segments = segment_text("first line\nsame paragraph\n\nsecond paragraph\n\n\nthird");
        assert_eq!(
            segments,
            vec![prose(&[
                "first line same paragraph",
                "second paragraph",
                "third"
            ])]
        );
    }

    #[test]
    fn test_unterminated_fence_stays_code() {
        let segments = segment_text("look:\n```rust\nfn main() {}");
        assert_eq!(
            segments,
            vec![prose(&["look:"]), code(Some("rust"), "fn main() {}")]
        );
    }

    #[test]
    fn test_fence_without_newline_has_no_language() {
        let segments = segment_text("```let x = 1;```");
        assert_eq!(segments, vec![code(None, "let x = 1;")]);
    }

    #[test]
    fn test_untagged_block() {
        let segments = segment_text("```\nplain code\n```");
        assert_eq!(segments, vec![code(None, "plain code")]);
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(segment_text("").is_empty());
        assert!(segment_text("  \n \n ").is_empty());
    }

    #[test]
    fn test_empty_prose_between_fences_is_skipped() {
        let segments = segment_text("```a\nx()\n```\n```b\ny()\n```");
        assert_eq!(
            segments,
            vec![code(Some("a"), "x()"), code(Some("b"), "y()")]
        );
    }
}
