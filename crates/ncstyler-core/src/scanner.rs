//! Comment and brace aware scanning of function bodies.
//!
//! The declaration parser reports where a function or method starts but not
//! what its body contains. [`find_body`] recovers the body text from the raw
//! source and [`extract_local_variable_names`] pulls assignment targets out of
//! it.
//!
//! Braces, parentheses and comment markers inside string or character
//! literals are not recognised as literals; a `"{"` literal shifts the depth
//! count.

use regex::Regex;
use std::sync::LazyLock;

use crate::names;

/// `<identifier> =`; a following second `=` is rejected after the match.
#[allow(clippy::expect_used)]
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("assignment pattern compiles")
});

/// A recovered function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyInfo<'a> {
    /// Text between the opening `{` and its matching `}`, both excluded.
    pub text: &'a str,
    /// Byte offset of `text` within the scanned source.
    pub start_offset: usize,
    /// Line (1-indexed) on which `text` starts.
    pub start_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Code,
    Line,
    Block { opening: bool },
    BlockClosing,
}

/// Walks bytes while tracking `//` and `/* */` comments.
///
/// Yields `(offset, byte, is_code)`. Comment delimiters themselves are not
/// code; the newline ending a line comment is.
struct CodeBytes<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: CommentState,
}

impl<'a> CodeBytes<'a> {
    fn new(text: &'a str, start: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: start,
            state: CommentState::Code,
        }
    }
}

impl Iterator for CodeBytes<'_> {
    type Item = (usize, u8, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.pos;
        let b = *self.bytes.get(i)?;
        let next = self.bytes.get(i + 1).copied();
        self.pos += 1;

        let is_code = match self.state {
            CommentState::Code => match (b, next) {
                (b'/', Some(b'*')) => {
                    self.state = CommentState::Block { opening: true };
                    false
                }
                (b'/', Some(b'/')) => {
                    self.state = CommentState::Line;
                    false
                }
                _ => true,
            },
            CommentState::Line => {
                if b == b'\n' {
                    self.state = CommentState::Code;
                    true
                } else {
                    false
                }
            }
            CommentState::Block { opening: true } => {
                self.state = CommentState::Block { opening: false };
                false
            }
            CommentState::Block { opening: false } => {
                if b == b'*' && next == Some(b'/') {
                    self.state = CommentState::BlockClosing;
                }
                false
            }
            CommentState::BlockClosing => {
                self.state = CommentState::Code;
                false
            }
        };

        Some((i, b, is_code))
    }
}

/// Replaces comment text with spaces, keeping newlines so line counts hold.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let bytes: Vec<u8> = CodeBytes::new(text, 0)
        .map(|(_, b, is_code)| if is_code || b == b'\n' { b } else { b' ' })
        .collect();
    // Comment boundaries are ASCII, so multi-byte characters are either kept
    // or blanked whole.
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Byte offset at which 1-indexed `line` starts.
fn line_offset(source: &str, line: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    if line == 1 {
        return Some(0);
    }
    source
        .match_indices('\n')
        .nth(line - 2)
        .map(|(idx, _)| idx + 1)
}

/// Locates the body of the function or method named `entity_name` declared
/// on `entity_line`.
///
/// Returns `None` for prototypes (a `;` before any `{`), when the name or
/// parameter list cannot be found, or when the braces never balance.
#[must_use]
pub fn find_body<'a>(
    source_text: &'a str,
    entity_line: usize,
    entity_name: &str,
) -> Option<BodyInfo<'a>> {
    let line_start = line_offset(source_text, entity_line)?;
    let slice = &source_text[line_start..];

    let name_re = names::search_regex(entity_name)?;
    let name_end = name_re.find(slice)?.end();

    let mut chars = CodeBytes::new(slice, name_end).filter(|&(_, _, is_code)| is_code);

    // Parameter list: first `(` after the name and its balancing `)`.
    chars.find(|&(_, b, _)| b == b'(')?;
    let mut parens = 1usize;
    for (_, b, _) in chars.by_ref() {
        match b {
            b'(' => parens += 1,
            b')' => {
                parens -= 1;
                if parens == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    if parens != 0 {
        return None;
    }

    let (open, opener, _) = chars.find(|&(_, b, _)| b == b';' || b == b'{')?;
    if opener == b';' {
        tracing::trace!("'{entity_name}' at line {entity_line} is a prototype");
        return None;
    }

    let mut depth = 1usize;
    let mut close = None;
    for (i, b, _) in chars {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }

    let Some(close) = close else {
        tracing::trace!("unbalanced body for '{entity_name}' at line {entity_line}");
        return None;
    };

    let start_line = entity_line + slice[..=open].matches('\n').count();
    Some(BodyInfo {
        text: &slice[open + 1..close],
        start_offset: line_start + open + 1,
        start_line,
    })
}

/// Extracts left-hand identifiers of simple assignments from a body.
///
/// Each occurrence is reported with the zero-based line index within
/// `body_text`. Comparisons (`==`) and commented-out code are ignored;
/// declarations and re-assignments are not told apart.
#[must_use]
pub fn extract_local_variable_names(body_text: &str) -> Vec<(String, usize)> {
    let code = strip_comments(body_text);
    let bytes = code.as_bytes();

    ASSIGNMENT
        .captures_iter(&code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if bytes.get(whole.end()) == Some(&b'=') {
                return None;
            }
            let name = caps.get(1)?;
            let line = code[..name.start()].matches('\n').count();
            Some((name.as_str().to_string(), line))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_of(found: &[(String, usize)]) -> Vec<&str> {
        found.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn ignores_brace_in_line_comment() {
        let src = "int Foo() { // { \n return 1; }";
        let body = find_body(src, 1, "Foo").expect("body");
        assert_eq!(body.text, " // { \n return 1; ");
        assert_eq!(body.start_line, 1);
        assert_eq!(&src[body.start_offset..body.start_offset + body.text.len()], body.text);
    }

    #[test]
    fn ignores_braces_in_block_comment() {
        let src = "void run()\n{\n  /* } } */\n  int x = 1;\n}\nint after;";
        let body = find_body(src, 1, "run").expect("body");
        assert!(body.text.contains("int x = 1;"));
        assert!(!body.text.contains("after"));
        assert_eq!(body.start_line, 2);
    }

    #[test]
    fn nested_braces_balance() {
        let src = "void f() { if (a) { b = 1; } else { c = 2; } }\nvoid g() {}";
        let body = find_body(src, 1, "f").expect("body");
        assert_eq!(body.text, " if (a) { b = 1; } else { c = 2; } ");
    }

    #[test]
    fn prototype_has_no_body() {
        let src = "int add(int a, int b);\nstruct S { int x; };";
        assert!(find_body(src, 1, "add").is_none());
    }

    #[test]
    fn missing_brace_has_no_body() {
        assert!(find_body("int add(int a, int b)", 1, "add").is_none());
    }

    #[test]
    fn unbalanced_body_is_none() {
        assert!(find_body("void f() { if (x) {", 1, "f").is_none());
    }

    #[test]
    fn missing_name_is_none() {
        assert!(find_body("void f() {}", 1, "g").is_none());
    }

    #[test]
    fn line_out_of_range_is_none() {
        assert!(find_body("void f() {}", 3, "f").is_none());
        assert!(find_body("void f() {}", 0, "f").is_none());
    }

    #[test]
    fn starts_at_declared_line() {
        let src = "void f() { a = 1; }\nvoid f() { b = 2; }\n";
        let body = find_body(src, 2, "f").expect("body");
        assert_eq!(body.text, " b = 2; ");
        assert_eq!(body.start_line, 2);
    }

    #[test]
    fn nested_parameter_parens() {
        let src = "void apply(void (*cb)(int), int v) { cb(v); }";
        let body = find_body(src, 1, "apply").expect("body");
        assert_eq!(body.text, " cb(v); ");
    }

    #[test]
    fn function_pointer_prototype_is_none() {
        assert!(find_body("void apply(void (*cb)(int));\n{}", 1, "apply").is_none());
    }

    #[test]
    fn operator_names_tolerate_whitespace() {
        let src = "bool operator == (const A& o) const { return true; }";
        assert!(find_body(src, 1, "operator==").is_some());
        let src = "bool operator==(const A& o) const { return true; }";
        assert!(find_body(src, 1, "operator ==").is_some());
        let src = "int& operator[](int i) { return v; }";
        let body = find_body(src, 1, "operator[]").expect("body");
        assert_eq!(body.text, " return v; ");
    }

    #[test]
    fn call_operator_uses_following_parameter_list() {
        let src = "int operator()(int x) { y = x; return y; }";
        let body = find_body(src, 1, "operator()").expect("body");
        assert_eq!(body.text, " y = x; return y; ");
    }

    #[test]
    fn template_names_match_on_base() {
        let src = "template <> void store<int>(int v) { slot = v; }";
        let body = find_body(src, 1, "store<int>").expect("body");
        assert_eq!(body.text, " slot = v; ");
    }

    #[test]
    fn semicolon_in_comment_before_body() {
        let src = "void f() // not a prototype;\n{\n x = 1;\n}";
        let body = find_body(src, 1, "f").expect("body");
        assert_eq!(body.start_line, 2);
    }

    #[test]
    fn extracts_assignments_not_comparisons_or_comments() {
        let found = extract_local_variable_names("int y = 2; // x = 1\nif (a == b) { z = 3; }");
        assert_eq!(names_of(&found), vec!["y", "z"]);
        assert_eq!(found[0].1, 0);
        assert_eq!(found[1].1, 1);
    }

    #[test]
    fn reports_every_occurrence() {
        let found = extract_local_variable_names("i = 0;\ni = i + 1;");
        assert_eq!(names_of(&found), vec!["i", "i"]);
    }

    #[test]
    fn ignores_block_comments_and_relational_operators() {
        let found =
            extract_local_variable_names("/* a = 1;\n b = 2; */ if (c <= d && e != f && g >= h) { k = 1; }");
        assert_eq!(names_of(&found), vec!["k"]);
        assert_eq!(found[0].1, 1);
    }

    #[test]
    fn chained_assignment_reports_both() {
        let found = extract_local_variable_names("a = b = 0;");
        assert_eq!(names_of(&found), vec!["a", "b"]);
    }

    #[test]
    fn strip_comments_keeps_layout() {
        let text = "a /* x\ny */ b // z\nc";
        let stripped = strip_comments(text);
        assert_eq!(stripped.len(), text.len());
        assert_eq!(stripped.matches('\n').count(), 2);
        assert!(stripped.contains('a'));
        assert!(!stripped.contains('x'));
        assert!(!stripped.contains('z'));
    }
}
