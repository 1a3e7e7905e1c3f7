//! Blank-line canonicalization for config files
//!
//! Applied to every config text right before it is written. It does not
//! look at the data, only at line shapes:
//!
//! - blank lines are dropped and then re-inserted canonically
//! - a top-level key gets one blank line above it, unless the line above
//!   is a comment (the comment documents the key)
//! - a comment that follows a non-comment line gets one blank line above it
//! - indented lines and top-level `- ` items stay glued to their parent
//! - the body of a `|` or `>` block scalar is copied verbatim, blank lines
//!   included, since those lines are part of the value
//! - the result ends with exactly one newline

use std::sync::LazyLock;

use regex::Regex;

use crate::tree::indent_of;

/// A key or `- ` item whose value is a block scalar header such as `|`,
/// `>-` or `|2+`, optionally followed by a comment.
static BLOCK_SCALAR_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-\s+)*(?:[^\s#][^#]*?:\s+)?(?P<header>[|>][0-9+-]*)\s*(?:#.*)?$")
        .expect("Invalid block scalar regex")
});

/// An open block scalar: its body is every following line that is blank or
/// indented deeper than the line that opened it.
struct BlockScalar {
    indent: usize,
    /// `+` chomping keeps trailing blank lines in the value
    keeps_trailing: bool,
}

impl BlockScalar {
    fn opened_by(line: &str) -> Option<Self> {
        let captures = BLOCK_SCALAR_OPENER.captures(line)?;
        Some(Self {
            indent: indent_of(line),
            keeps_trailing: captures["header"].contains('+'),
        })
    }
}

/// Canonicalize blank lines in `text`.
pub fn format_config(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() * 2);
    let mut block: Option<BlockScalar> = None;
    let mut held_blanks: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if let Some(open) = &block {
            if line.trim().is_empty() {
                held_blanks.push(line);
                continue;
            }
            if indent_of(line) > open.indent {
                out.append(&mut held_blanks);
                out.push(line);
                continue;
            }
            if open.keeps_trailing {
                out.append(&mut held_blanks);
            }
            held_blanks.clear();
            block = None;
        }

        if line.trim().is_empty() {
            continue;
        }

        let previous = if i == 0 { None } else { Some(lines[i - 1]) };
        let previous_is_comment = previous.is_some_and(|p| p.starts_with('#'));

        if line.starts_with('#') {
            if !previous_is_comment {
                push_separator(&mut out);
            }
            out.push(line);
            continue;
        }

        if !is_nested(line) && !previous_is_comment {
            push_separator(&mut out);
        }
        out.push(line);
        block = BlockScalar::opened_by(line);
    }

    let mut formatted = out.join("\n");
    formatted.push('\n');
    formatted
}

/// One blank line, never at the start and never doubled.
fn push_separator(out: &mut Vec<&str>) {
    if out.last().is_some_and(|last| !last.is_empty()) {
        out.push("");
    }
}

fn is_nested(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t') || line == "-" || line.starts_with("- ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_yaml;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_separates_top_level_keys() {
        assert_eq!(format_config("a: 1\nb: 2\n"), "a: 1\n\nb: 2\n");
    }

    #[test]
    fn test_keeps_nested_lines_together() {
        assert_eq!(
            format_config("a:\n  x: 1\n\n\n  y: 2\nlist:\n- one\n- two"),
            "a:\n  x: 1\n  y: 2\n\nlist:\n- one\n- two\n"
        );
    }

    #[test]
    fn test_comment_sticks_to_following_key() {
        assert_eq!(
            format_config("# header\nversion: 1\n# about name\nname: x\n"),
            "# header\nversion: 1\n\n# about name\nname: x\n"
        );
    }

    #[test]
    fn test_adjacent_comments_untouched() {
        assert_eq!(format_config("# one\n# two\na: 1"), "# one\n# two\na: 1\n");
    }

    #[test]
    fn test_single_trailing_newline() {
        assert_eq!(format_config("\n\na: 1\n\n\n"), "a: 1\n");
    }

    #[test]
    fn test_block_scalar_keeps_inner_blank_lines() {
        let text = "text: |-\n  para1\n\n  para2\nnext: 1\n";
        let formatted = format_config(text);
        assert_eq!(formatted, "text: |-\n  para1\n\n  para2\n\nnext: 1\n");
        assert_eq!(parse_yaml(&formatted).unwrap(), parse_yaml(text).unwrap());
    }

    #[test]
    fn test_block_scalar_sequence_item() {
        let text = "items:\n- |-\n  one\n\n\n  two\n- three\n";
        assert_eq!(format_config(text), text);
        assert_eq!(
            parse_yaml(&format_config(text)).unwrap()["items"][0],
            "one\n\n\ntwo"
        );
    }

    #[test]
    fn test_block_scalar_trailing_blanks_normalized() {
        assert_eq!(format_config("a: >\n  x\n\n\n\nb: 1"), "a: >\n  x\n\nb: 1\n");
    }

    #[test]
    fn test_block_scalar_keep_chomping_keeps_trailing_blanks() {
        let text = "a: |+\n  x\n\nb: 1\n";
        assert_eq!(format_config(text), text);
        assert_eq!(parse_yaml(text).unwrap()["a"], "x\n\n");
    }
}
