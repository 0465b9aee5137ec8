//! Name normalization and recovery from raw declaration text.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("static pattern compiles"));
    };
}

// `operator` then a symbol, or whitespace then a word (conversions, new/delete).
static_regex!(OPERATOR, r"^operator(?:\s*[^\w\s]|\s+\w)");
// `type (Class::*name)(...)`
static_regex!(
    MEMBER_FUNCTION_POINTER,
    r"\(\s*(?:[\w<>]+\s*::\s*)+\*\s*([A-Za-z_]\w*)\s*\)"
);
// `type (*name)(...)`
static_regex!(FUNCTION_POINTER, r"\(\s*\*\s*([A-Za-z_]\w*)\s*\)\s*\(");
// `typedef ret (*Name)(...)` or `typedef ret (Class::*Name)(...)`
static_regex!(
    FUNCTION_POINTER_TYPEDEF,
    r"^\s*typedef\b[^;]*?\(\s*(?:[\w<>]+\s*::\s*)*\*\s*([A-Za-z_]\w*)\s*\)\s*\("
);
// `(ns::)?name<...>(` in raw declaration text
static_regex!(
    TEMPLATE_CALLABLE,
    r"(?:[A-Za-z_]\w*\s*::\s*)*([A-Za-z_]\w*)\s*<(?:[^()<>]|<[^()<>]*>)*>\s*\("
);

/// Returns true for operator-overload names such as `operator==`,
/// `operator []` or `operator bool`.
///
/// `operatorStuff` is an ordinary identifier.
#[must_use]
pub fn is_operator_name(name: &str) -> bool {
    OPERATOR.is_match(name.trim())
}

/// Last whitespace separated token of a name (`union Foo` becomes `Foo`).
#[must_use]
pub fn last_token(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or("")
}

/// Name with template arguments and qualification removed.
///
/// `ns::Box<T>` becomes `Box`, `~Box` stays `~Box`.
#[must_use]
pub fn base_name(name: &str) -> &str {
    let unqualified_template = name.split('<').next().unwrap_or(name);
    unqualified_template
        .rsplit("::")
        .next()
        .unwrap_or(unqualified_template)
        .trim()
}

/// Recovers the plain name of a templated callable such as `store<int>`.
///
/// The text before `<` is used when it is usable; otherwise `raw` is searched
/// for `(ns::)?name<...>(`.
#[must_use]
pub fn recover_template_name(name: &str, raw: &str) -> Option<String> {
    let candidate = base_name(name);
    if !candidate.is_empty() && candidate.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some(candidate.to_string());
    }
    TEMPLATE_CALLABLE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Recovers a parameter name from function pointer declaration text.
///
/// Returns the name and whether it is a pointer to a member function
/// (`Class::*name`).
#[must_use]
pub fn functor_parameter_name(text: &str) -> Option<(String, bool)> {
    if let Some(m) = MEMBER_FUNCTION_POINTER.captures(text).and_then(|c| c.get(1)) {
        return Some((m.as_str().to_string(), true));
    }
    FUNCTION_POINTER
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| (m.as_str().to_string(), false))
}

/// Name declared by a function pointer `typedef`, if `raw` is one.
#[must_use]
pub fn function_pointer_typedef(raw: &str) -> Option<String> {
    FUNCTION_POINTER_TYPEDEF
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Builds a regex locating `name` in source text.
///
/// Whitespace is tolerated wherever a symbol meets another token, so
/// `operator==` also finds `operator ==`. Template arguments are dropped
/// except for operator names, where `<` is the operator itself.
#[must_use]
pub fn search_regex(name: &str) -> Option<Regex> {
    let name = name.trim();
    let name = if is_operator_name(name) {
        name
    } else {
        name.split('<').next().unwrap_or(name).trim_end()
    };

    let mut pattern = String::new();
    let mut prev: Option<char> = None;
    let mut gap = false;
    for c in name.chars() {
        if c.is_whitespace() {
            gap = true;
            continue;
        }
        match prev {
            Some(p) if is_word(p) && is_word(c) => {
                if gap {
                    pattern.push_str(r"\s+");
                }
            }
            Some(_) => pattern.push_str(r"\s*"),
            None if is_word(c) => pattern.push_str(r"\b"),
            None => {}
        }
        pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        prev = Some(c);
        gap = false;
    }

    match prev {
        None => None,
        Some(last) => {
            if is_word(last) {
                pattern.push_str(r"\b");
            }
            Regex::new(&pattern).ok()
        }
    }
}
