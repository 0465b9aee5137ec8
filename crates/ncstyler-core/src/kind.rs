//! Construct kinds and the fixed rule inheritance graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a declared source entity, used to select a naming rule.
///
/// The canonical (snake_case) name of each kind is the key used in rule
/// files. [`ConstructKind::Base`] is the root of the inheritance graph and is
/// spelled `_base_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    /// Root of the inheritance graph, supplies defaults.
    #[serde(rename = "_base_")]
    Base,
    /// `class Foo`
    Class,
    /// `struct Foo`
    Struct,
    /// `union Foo`
    Union,
    /// `enum Foo`
    Enum,
    /// A value inside an enum body.
    EnumValue,
    /// `namespace foo`
    Namespace,
    /// Free function.
    Function,
    /// Method of a `class`.
    ClassMethod,
    /// Method of a `struct` or `union`.
    StructMethod,
    /// Object-like macro.
    Define,
    /// Function-like macro.
    DefineFunction,
    /// Parameter of a function-like macro.
    DefineFunctionArgument,
    /// Any variable; also used for locals inside function bodies.
    Variant,
    /// `static` variable, global or member.
    StaticVariant,
    /// Non-static global variable.
    GlobalVariant,
    /// Non-static `class` member variable.
    ClassVariant,
    /// Non-static `struct`/`union` member variable.
    StructVariant,
    /// Any parameter.
    Argument,
    /// Parameter of a free function.
    FunctionArgument,
    /// Parameter of a `class` method.
    ClassMethodArgument,
    /// Parameter of a `struct`/`union` method.
    StructMethodArgument,
    /// Basename of the validated file.
    Filename,
    /// `typedef` or `using` alias.
    Typedef,
}

impl ConstructKind {
    /// Every kind, root first.
    pub const ALL: [Self; 24] = [
        Self::Base,
        Self::Class,
        Self::Struct,
        Self::Union,
        Self::Enum,
        Self::EnumValue,
        Self::Namespace,
        Self::Function,
        Self::ClassMethod,
        Self::StructMethod,
        Self::Define,
        Self::DefineFunction,
        Self::DefineFunctionArgument,
        Self::Variant,
        Self::StaticVariant,
        Self::GlobalVariant,
        Self::ClassVariant,
        Self::StructVariant,
        Self::Argument,
        Self::FunctionArgument,
        Self::ClassMethodArgument,
        Self::StructMethodArgument,
        Self::Filename,
        Self::Typedef,
    ];

    /// Canonical name as used in rule files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "_base_",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::EnumValue => "enum_value",
            Self::Namespace => "namespace",
            Self::Function => "function",
            Self::ClassMethod => "class_method",
            Self::StructMethod => "struct_method",
            Self::Define => "define",
            Self::DefineFunction => "define_function",
            Self::DefineFunctionArgument => "define_function_argument",
            Self::Variant => "variant",
            Self::StaticVariant => "static_variant",
            Self::GlobalVariant => "global_variant",
            Self::ClassVariant => "class_variant",
            Self::StructVariant => "struct_variant",
            Self::Argument => "argument",
            Self::FunctionArgument => "function_argument",
            Self::ClassMethodArgument => "class_method_argument",
            Self::StructMethodArgument => "struct_method_argument",
            Self::Filename => "filename",
            Self::Typedef => "typedef",
        }
    }

    /// Looks a kind up by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// The more general kind this one inherits unset rule fields from.
    ///
    /// Returns `None` only for [`ConstructKind::Base`].
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        let parent = match self {
            Self::Base => return None,
            Self::Class
            | Self::EnumValue
            | Self::Namespace
            | Self::Function
            | Self::Define
            | Self::Variant
            | Self::Filename => Self::Base,
            Self::Struct | Self::Enum | Self::Typedef => Self::Class,
            Self::Union => Self::Struct,
            Self::ClassMethod => Self::Function,
            Self::StructMethod => Self::ClassMethod,
            Self::DefineFunction => Self::Define,
            Self::StaticVariant | Self::GlobalVariant | Self::ClassVariant | Self::Argument => {
                Self::Variant
            }
            Self::StructVariant => Self::ClassVariant,
            Self::FunctionArgument => Self::Argument,
            Self::ClassMethodArgument | Self::DefineFunctionArgument => Self::FunctionArgument,
            Self::StructMethodArgument => Self::ClassMethodArgument,
        };
        Some(parent)
    }

    /// Inheritance chain from this kind up to (and including) the root.
    #[must_use]
    pub fn ancestry(self) -> Vec<Self> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Human readable form of the canonical name, words capitalized.
    ///
    /// `class_method_argument` becomes `Class Method Argument`.
    #[must_use]
    pub fn humanized(self) -> String {
        self.as_str()
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
