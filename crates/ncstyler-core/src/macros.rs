//! `#define` parsing.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DEFINE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#\s*define\s+)?([A-Za-z_][A-Za-z0-9_]*)(\()?")
        .expect("define pattern compiles")
});

/// A parameter of a function-like macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroParameter {
    /// Parameter name, `...` stripped from named variadics.
    pub name: String,
    /// Line (1-indexed) of the owning `#define`.
    pub line: usize,
}

/// A macro definition recovered from its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefine {
    /// Macro name.
    pub name: String,
    /// Line (1-indexed) of the `#define`.
    pub line: usize,
    /// Parameter list; `Some` for function-like macros, even when empty.
    pub parameters: Option<Vec<MacroParameter>>,
}

impl MacroDefine {
    /// Parses raw macro text, with or without the leading `#define`.
    ///
    /// A macro is function-like when `(` directly follows its name.
    /// Returns `None` when no name can be found.
    #[must_use]
    pub fn parse(text: &str, line: usize) -> Option<Self> {
        let caps = DEFINE_HEAD.captures(text)?;
        let name = caps.get(1)?.as_str().to_string();

        let parameters = caps.get(2).map(|open| {
            let rest = &text[open.end()..];
            let list = rest.split(')').next().unwrap_or(rest);
            list.split(',')
                .map(|p| p.trim().trim_end_matches("...").trim())
                .filter(|p| !p.is_empty())
                .map(|p| MacroParameter {
                    name: p.to_string(),
                    line,
                })
                .collect()
        });

        Some(Self {
            name,
            line,
            parameters,
        })
    }

    /// Returns true if the macro takes a parameter list.
    #[must_use]
    pub fn is_function_like(&self) -> bool {
        self.parameters.is_some()
    }
}
