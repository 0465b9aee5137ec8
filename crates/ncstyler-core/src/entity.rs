//! Declarations reported by a language front-end.
//!
//! A [`SourceEntities`] value is the complete output of parsing one file. The
//! validator consumes it read-only; nothing here is mutated after parsing.

/// Name, position and raw text shared by every declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Declared name as written, possibly empty for anonymous constructs.
    pub name: String,
    /// Line (1-indexed) where the declaration starts.
    pub line: usize,
    /// Raw declaration text, used to recover names the structured fields miss.
    pub raw: String,
}

impl Declaration {
    /// Creates a declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, line: usize, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line,
            raw: raw.into(),
        }
    }
}

/// Member access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// `public:`
    Public,
    /// `protected:`
    Protected,
    /// `private:`
    Private,
}

/// A function or method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Declared name; empty when the front-end could not extract one.
    pub name: String,
    /// Type as written, without the name.
    pub type_text: String,
    /// Full parameter text, name included.
    pub raw: String,
    /// Line (1-indexed).
    pub line: usize,
}

/// A free function, an out-of-line method definition, or a method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    /// Unqualified name, raw text is the header up to the body.
    pub decl: Declaration,
    /// Qualification of an out-of-line definition (`Foo` for `Foo::bar`).
    pub scope: Option<String>,
    /// Return type text, `None` for constructors, destructors and conversions.
    pub return_type: Option<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Declared `static`.
    pub is_static: bool,
    /// Access level when declared inside a record.
    pub access: Option<Access>,
}

/// A global, static or member variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    /// Variable name and its declaration.
    pub decl: Declaration,
    /// Declared type text.
    pub type_text: String,
    /// Declared `static`.
    pub is_static: bool,
    /// Access level when declared inside a record.
    pub access: Option<Access>,
}

/// Keyword a record was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStyle {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
}

/// A class, struct or union with everything declared inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record name (may carry template arguments) and its header text.
    pub decl: Declaration,
    /// Declaring keyword.
    pub style: RecordStyle,
    /// Methods, including constructors, destructors and operators.
    pub methods: Vec<Function>,
    /// Member variables.
    pub members: Vec<Variable>,
    /// Records declared inside this one.
    pub nested: Vec<Record>,
    /// Enums declared inside this one.
    pub enums: Vec<Enum>,
    /// Typedefs and aliases declared inside this one.
    pub typedefs: Vec<Declaration>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new(decl: Declaration, style: RecordStyle) -> Self {
        Self {
            decl,
            style,
            methods: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
            enums: Vec::new(),
            typedefs: Vec::new(),
        }
    }

    /// Finds a record by base name in this record or its nested records.
    #[must_use]
    pub fn find(&self, base_name: &str) -> Option<&Record> {
        if crate::names::base_name(&self.decl.name) == base_name {
            return Some(self);
        }
        self.nested.iter().find_map(|r| r.find(base_name))
    }
}

/// A value inside an enum body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Enumerator name.
    pub name: String,
    /// Line (1-indexed).
    pub line: usize,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// Enum name, empty for anonymous enums.
    pub decl: Declaration,
    /// Enumerators in declaration order.
    pub values: Vec<EnumValue>,
}

/// A namespace name, one per segment of `a::b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Line (1-indexed).
    pub line: usize,
}

/// Raw text of a `#define` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroText {
    /// Directive text, `#define` included.
    pub text: String,
    /// Line (1-indexed).
    pub line: usize,
}

/// Every declaration found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEntities {
    /// Macro definitions in source order.
    pub defines: Vec<MacroText>,
    /// Free functions and out-of-line method definitions.
    pub functions: Vec<Function>,
    /// Records declared with `class`.
    pub classes: Vec<Record>,
    /// Records declared with `struct` or `union`.
    pub structs: Vec<Record>,
    /// Enums outside any record.
    pub enums: Vec<Enum>,
    /// Global and namespace-scope variables.
    pub variables: Vec<Variable>,
    /// Namespace names.
    pub namespaces: Vec<Namespace>,
    /// Typedefs and aliases outside any record.
    pub typedefs: Vec<Declaration>,
}

impl SourceEntities {
    /// Finds a record by base name anywhere in the file.
    #[must_use]
    pub fn find_record(&self, base_name: &str) -> Option<&Record> {
        self.classes
            .iter()
            .chain(&self.structs)
            .find_map(|r| r.find(base_name))
    }

    /// Returns true if a namespace with this name is declared.
    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.iter().any(|n| n.name == name)
    }

    /// Total number of top-level entities, for logging.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
            + self.functions.len()
            + self.classes.len()
            + self.structs.len()
            + self.enums.len()
            + self.variables.len()
            + self.namespaces.len()
            + self.typedefs.len()
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
