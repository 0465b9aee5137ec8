//! C and C++ declaration parser using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use ncstyler_core::{
    Access, Declaration, Enum, EnumValue, Function, MacroText, Namespace, Parameter, Record,
    RecordStyle, SourceEntities, Variable,
};

use crate::parser::{DeclarationParser, ParseError};

/// Declarator kinds that name a callable directly.
const CALLABLE_NAMES: &[&str] = &[
    "identifier",
    "field_identifier",
    "qualified_identifier",
    "operator_name",
    "destructor_name",
    "template_function",
    "template_method",
    "operator_cast",
];

/// Extracts macros, functions, records, enums, variables, namespaces and
/// typedefs from C and C++ source.
pub struct CppParser {
    language: Language,
}

impl CppParser {
    /// Creates a new C++ parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

impl Default for CppParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationParser for CppParser {
    fn language_id(&self) -> &'static str {
        "cpp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".c", ".h", ".cc", ".cpp", ".cxx", ".hh", ".hpp", ".hxx", ".inl"]
    }

    fn parse(&self, source: &str) -> Result<SourceEntities, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!("source has syntax errors, declarations inside them may be missed");
        }

        let mut collector = Collector {
            src,
            entities: SourceEntities::default(),
        };
        collector.walk_items(&root);
        tracing::debug!(
            "extracted {} top-level declarations",
            collector.entities.len()
        );
        Ok(collector.entities)
    }
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn line(node: &Node<'_>) -> usize {
    node.start_position().row + 1
}

fn is_static(node: &Node<'_>, src: &[u8]) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| c.kind() == "storage_class_specifier" && text(&c, src) == "static");
    found
}

/// Child of a declarator wrapper (pointer, reference, array, init...).
fn inner_declarator<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    let last = node.named_children(&mut cursor).last();
    match node.kind() {
        "attributed_declarator" => node.named_child(0),
        "reference_declarator" | "parenthesized_declarator" | "variadic_declarator" => last,
        _ => None,
    }
}

/// Name declared by a declarator, with the qualification of `a::b` names.
fn declared_name(node: &Node<'_>, src: &[u8]) -> Option<(Option<String>, String)> {
    match node.kind() {
        "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
        | "operator_name" | "namespace_identifier" | "template_function" | "template_method"
        | "template_type" => Some((None, text(node, src).trim().to_string())),
        "operator_cast" => {
            let full = text(node, src);
            let head = full.split('(').next().unwrap_or(full);
            Some((None, head.trim().to_string()))
        }
        "qualified_identifier" => {
            let mut scopes = Vec::new();
            let mut current = *node;
            while current.kind() == "qualified_identifier" {
                if let Some(scope) = current.child_by_field_name("scope") {
                    scopes.push(text(&scope, src).trim());
                }
                current = current.child_by_field_name("name")?;
            }
            let (_, name) = declared_name(&current, src)?;
            let scope = (!scopes.is_empty()).then(|| scopes.join("::"));
            Some((scope, name))
        }
        _ => declared_name(&inner_declarator(node)?, src),
    }
}

/// Name node and parameter list of a declarator that declares a function.
///
/// Function pointers (`int (*fp)(int)`) are variables, not functions.
fn callable<'t>(node: &Node<'t>) -> Option<(Node<'t>, Option<Node<'t>>)> {
    match node.kind() {
        "function_declarator" => {
            let target = node.child_by_field_name("declarator")?;
            CALLABLE_NAMES
                .contains(&target.kind())
                .then(|| (target, node.child_by_field_name("parameters")))
        }
        "operator_cast" => Some((*node, None)),
        "qualified_identifier" => {
            let mut current = *node;
            while current.kind() == "qualified_identifier" {
                current = current.child_by_field_name("name")?;
            }
            (current.kind() == "operator_cast").then_some((*node, None))
        }
        "pointer_declarator" | "reference_declarator" | "attributed_declarator" => {
            callable(&inner_declarator(node)?)
        }
        _ => None,
    }
}

fn parameters(list: Option<Node<'_>>, src: &[u8]) -> Vec<Parameter> {
    let Some(list) = list else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    let params = list
        .named_children(&mut cursor)
        .filter(|p| {
            matches!(
                p.kind(),
                "parameter_declaration"
                    | "optional_parameter_declaration"
                    | "variadic_parameter_declaration"
            )
        })
        .map(|p| {
            let raw = text(&p, src);
            // Member function pointers are recovered from the raw text.
            let is_member_pointer = raw
                .split_whitespace()
                .collect::<String>()
                .contains("::*");
            let name = if is_member_pointer {
                String::new()
            } else {
                p.child_by_field_name("declarator")
                    .and_then(|d| declared_name(&d, src))
                    .map(|(_, name)| name)
                    .unwrap_or_default()
            };
            Parameter {
                name,
                type_text: p
                    .child_by_field_name("type")
                    .map(|t| text(&t, src).to_string())
                    .unwrap_or_default(),
                raw: raw.to_string(),
                line: line(&p),
            }
        })
        .collect();
    params
}

fn access_of(node: &Node<'_>, src: &[u8]) -> Option<Access> {
    let label = text(node, src).trim();
    if label.starts_with("public") {
        Some(Access::Public)
    } else if label.starts_with("protected") {
        Some(Access::Protected)
    } else if label.starts_with("private") {
        Some(Access::Private)
    } else {
        None
    }
}

/// A record or enum found in a type position.
enum Specifier {
    Record(Record),
    Enum(Enum),
}

impl Specifier {
    fn nest_into(self, record: &mut Record) {
        match self {
            Self::Record(r) => record.nested.push(r),
            Self::Enum(e) => record.enums.push(e),
        }
    }
}

struct Collector<'s> {
    src: &'s [u8],
    entities: SourceEntities,
}

impl Collector<'_> {
    fn walk_items(&mut self, container: &Node<'_>) {
        let mut cursor = container.walk();
        for item in container.named_children(&mut cursor) {
            self.walk_item(&item);
        }
    }

    fn walk_item(&mut self, node: &Node<'_>) {
        match node.kind() {
            "preproc_def" | "preproc_function_def" => self.entities.defines.push(MacroText {
                text: text(node, self.src).trim_end().to_string(),
                line: line(node),
            }),
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif"
            | "preproc_elifdef" | "declaration_list" | "template_declaration" => {
                self.walk_items(node);
            }
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_item(&body);
                }
            }
            "namespace_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    for segment in text(&name, self.src)
                        .split("::")
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                    {
                        self.entities.namespaces.push(Namespace {
                            name: segment.to_string(),
                            line: line(node),
                        });
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_items(&body);
                }
            }
            "function_definition" => {
                if let Some(function) = self.function_definition(node) {
                    self.entities.functions.push(function);
                }
            }
            "declaration" => self.declaration(node),
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                if let Some(spec) = self.specifier(node) {
                    self.place(spec);
                }
            }
            "type_definition" => {
                let (typedefs, spec) = self.type_definition(node);
                self.entities.typedefs.extend(typedefs);
                if let Some(spec) = spec {
                    self.place(spec);
                }
            }
            "alias_declaration" => {
                if let Some(alias) = self.alias(node) {
                    self.entities.typedefs.push(alias);
                }
            }
            _ => {}
        }
    }

    fn place(&mut self, spec: Specifier) {
        match spec {
            Specifier::Record(r) if r.style == RecordStyle::Class => self.entities.classes.push(r),
            Specifier::Record(r) => self.entities.structs.push(r),
            Specifier::Enum(e) => self.entities.enums.push(e),
        }
    }

    fn declaration(&mut self, node: &Node<'_>) {
        if let Some(spec) = node
            .child_by_field_name("type")
            .and_then(|t| self.specifier(&t))
        {
            self.place(spec);
        }

        let raw = text(node, self.src).trim();
        let type_text = node
            .child_by_field_name("type")
            .map_or("", |t| text(&t, self.src));
        let is_static = is_static(node, self.src);

        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            if callable(&declarator).is_some() {
                if let Some(function) = self.function(node, &declarator, raw) {
                    self.entities.functions.push(function);
                }
            } else if let Some((_, name)) = declared_name(&declarator, self.src) {
                self.entities.variables.push(Variable {
                    decl: Declaration::new(name, line(&declarator), raw),
                    type_text: type_text.to_string(),
                    is_static,
                    access: None,
                });
            }
        }
    }

    fn function(&self, node: &Node<'_>, declarator: &Node<'_>, raw: &str) -> Option<Function> {
        let (name_node, params) = callable(declarator)?;
        let (scope, name) = declared_name(&name_node, self.src)?;
        Some(Function {
            decl: Declaration::new(name, line(node), raw),
            scope,
            return_type: node
                .child_by_field_name("type")
                .map(|t| text(&t, self.src).to_string()),
            parameters: parameters(params, self.src),
            is_static: is_static(node, self.src),
            access: None,
        })
    }

    fn function_definition(&self, node: &Node<'_>) -> Option<Function> {
        let declarator = node.child_by_field_name("declarator")?;
        let header_end = node
            .child_by_field_name("body")
            .map_or(node.end_byte(), |b| b.start_byte());
        let header = std::str::from_utf8(&self.src[node.start_byte()..header_end]).unwrap_or("");
        self.function(node, &declarator, header.trim())
    }

    fn specifier(&self, node: &Node<'_>) -> Option<Specifier> {
        match node.kind() {
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                self.record(node).map(Specifier::Record)
            }
            "enum_specifier" => self.enumeration(node).map(Specifier::Enum),
            _ => None,
        }
    }

    fn record(&self, node: &Node<'_>) -> Option<Record> {
        // Forward declarations have no body.
        let body = node.child_by_field_name("body")?;
        let style = match node.kind() {
            "class_specifier" => RecordStyle::Class,
            "struct_specifier" => RecordStyle::Struct,
            _ => RecordStyle::Union,
        };
        let name = node
            .child_by_field_name("name")
            .map_or("", |n| text(&n, self.src));

        let mut record = Record::new(
            Declaration::new(name, line(node), text(node, self.src)),
            style,
        );
        let access = if style == RecordStyle::Class {
            Access::Private
        } else {
            Access::Public
        };
        self.record_body(&body, &mut record, access);
        Some(record)
    }

    fn record_body(&self, list: &Node<'_>, record: &mut Record, mut access: Access) {
        let mut cursor = list.walk();
        for item in list.named_children(&mut cursor) {
            match item.kind() {
                "access_specifier" => {
                    if let Some(next) = access_of(&item, self.src) {
                        access = next;
                    }
                }
                "field_declaration" | "declaration" => self.member(&item, record, access),
                "function_definition" => {
                    if let Some(mut method) = self.function_definition(&item) {
                        method.access = Some(access);
                        record.methods.push(method);
                    }
                }
                "template_declaration" | "preproc_if" | "preproc_ifdef" | "preproc_else"
                | "preproc_elif" => self.record_body(&item, record, access),
                "type_definition" => {
                    let (typedefs, spec) = self.type_definition(&item);
                    record.typedefs.extend(typedefs);
                    if let Some(spec) = spec {
                        spec.nest_into(record);
                    }
                }
                "alias_declaration" => record.typedefs.extend(self.alias(&item)),
                "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                    if let Some(spec) = self.specifier(&item) {
                        spec.nest_into(record);
                    }
                }
                _ => {}
            }
        }
    }

    fn member(&self, node: &Node<'_>, record: &mut Record, access: Access) {
        if let Some(spec) = node
            .child_by_field_name("type")
            .and_then(|t| self.specifier(&t))
        {
            spec.nest_into(record);
        }

        let raw = text(node, self.src).trim();
        let type_text = node
            .child_by_field_name("type")
            .map_or("", |t| text(&t, self.src));
        let is_static = is_static(node, self.src);

        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            if callable(&declarator).is_some() {
                if let Some(mut method) = self.function(node, &declarator, raw) {
                    method.access = Some(access);
                    record.methods.push(method);
                }
            } else if let Some((_, name)) = declared_name(&declarator, self.src) {
                record.members.push(Variable {
                    decl: Declaration::new(name, line(&declarator), raw),
                    type_text: type_text.to_string(),
                    is_static,
                    access: Some(access),
                });
            }
        }
    }

    fn enumeration(&self, node: &Node<'_>) -> Option<Enum> {
        let body = node.child_by_field_name("body")?;
        let name = node
            .child_by_field_name("name")
            .map_or("", |n| text(&n, self.src));

        let mut cursor = body.walk();
        let values = body
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "enumerator")
            .filter_map(|c| {
                let value = c.child_by_field_name("name")?;
                Some(EnumValue {
                    name: text(&value, self.src).to_string(),
                    line: line(&value),
                })
            })
            .collect();

        Some(Enum {
            decl: Declaration::new(name, line(node), text(node, self.src)),
            values,
        })
    }

    fn type_definition(&self, node: &Node<'_>) -> (Vec<Declaration>, Option<Specifier>) {
        let spec = node
            .child_by_field_name("type")
            .and_then(|t| self.specifier(&t));
        let raw = text(node, self.src).trim();

        let mut cursor = node.walk();
        let typedefs = node
            .children_by_field_name("declarator", &mut cursor)
            .filter_map(|d| declared_name(&d, self.src))
            .map(|(_, name)| Declaration::new(name, line(node), raw))
            .collect();
        (typedefs, spec)
    }

    fn alias(&self, node: &Node<'_>) -> Option<Declaration> {
        let name = node.child_by_field_name("name")?;
        Some(Declaration::new(
            text(&name, self.src),
            line(node),
            text(node, self.src).trim(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceEntities {
        CppParser::new().parse(src).expect("parse should succeed")
    }

    #[test]
    fn extracts_macros() {
        let e = parse("#define LIMIT 10\n#define MAX(a,b) ((a)>(b)?(a):(b))\n");
        assert_eq!(e.defines.len(), 2);
        assert_eq!(e.defines[0].text, "#define LIMIT 10");
        assert_eq!(e.defines[1].line, 2);
        assert!(e.defines[1].text.starts_with("#define MAX(a,b)"));
    }

    #[test]
    fn extracts_free_functions() {
        let e = parse("static int add(int lhs, int rhs) { return lhs + rhs; }\nvoid log(const char* msg);\n");
        assert_eq!(e.functions.len(), 2);
        let add = &e.functions[0];
        assert_eq!(add.decl.name, "add");
        assert_eq!(add.decl.line, 1);
        assert!(add.is_static);
        assert_eq!(add.return_type.as_deref(), Some("int"));
        assert_eq!(add.decl.raw, "static int add(int lhs, int rhs)");
        let names: Vec<&str> = add.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["lhs", "rhs"]);

        let log = &e.functions[1];
        assert_eq!(log.decl.name, "log");
        assert_eq!(log.parameters[0].name, "msg");
    }

    #[test]
    fn function_pointer_is_a_variable() {
        let e = parse("int (*compare)(const void*, const void*);\n");
        assert!(e.functions.is_empty());
        assert_eq!(e.variables.len(), 1);
        assert_eq!(e.variables[0].decl.name, "compare");
    }

    #[test]
    fn extracts_classes_with_members() {
        let src = r"
class Widget {
public:
    Widget();
    ~Widget();
    void resize(int width);
    bool operator==(const Widget& other) const;
    static int s_count;
private:
    int m_width;
};
";
        let e = parse(src);
        assert_eq!(e.classes.len(), 1);
        let widget = &e.classes[0];
        assert_eq!(widget.decl.name, "Widget");
        assert_eq!(widget.decl.line, 2);
        assert_eq!(widget.style, RecordStyle::Class);

        let methods: Vec<&str> = widget.methods.iter().map(|m| m.decl.name.as_str()).collect();
        assert_eq!(methods, vec!["Widget", "~Widget", "resize", "operator=="]);
        assert_eq!(widget.methods[2].parameters[0].name, "width");
        assert_eq!(widget.methods[2].access, Some(Access::Public));

        assert_eq!(widget.members.len(), 2);
        assert_eq!(widget.members[0].decl.name, "s_count");
        assert!(widget.members[0].is_static);
        assert_eq!(widget.members[1].decl.name, "m_width");
        assert_eq!(widget.members[1].access, Some(Access::Private));
    }

    #[test]
    fn structs_and_unions_go_to_structs() {
        let e = parse("struct Point { int x; int y; };\nunion Value { int i; float f; };\nclass Fwd;\n");
        assert!(e.classes.is_empty());
        assert_eq!(e.structs.len(), 2);
        assert_eq!(e.structs[0].style, RecordStyle::Struct);
        assert_eq!(e.structs[1].style, RecordStyle::Union);
        assert_eq!(e.structs[1].decl.name, "Value");
        assert_eq!(e.structs[0].members[0].access, Some(Access::Public));
    }

    #[test]
    fn nested_records_and_enums() {
        let src = r"
class Outer {
    struct Inner { int value; };
    enum Mode { Fast, Slow };
    typedef int Handle;
};
";
        let e = parse(src);
        let outer = &e.classes[0];
        assert_eq!(outer.nested.len(), 1);
        assert_eq!(outer.nested[0].decl.name, "Inner");
        assert_eq!(outer.enums.len(), 1);
        let values: Vec<&str> = outer.enums[0].values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(values, vec!["Fast", "Slow"]);
        assert_eq!(outer.typedefs[0].name, "Handle");
    }

    #[test]
    fn out_of_line_definitions_carry_scope() {
        let e = parse("void Widget::resize(int width) {\n  m_width = width;\n}\n");
        assert_eq!(e.functions.len(), 1);
        assert_eq!(e.functions[0].decl.name, "resize");
        assert_eq!(e.functions[0].scope.as_deref(), Some("Widget"));
    }

    #[test]
    fn namespaces_and_nested_declarations() {
        let e = parse("namespace outer::inner {\nint g_total = 0;\nvoid run();\n}\nnamespace {}\n");
        let names: Vec<&str> = e.namespaces.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert_eq!(e.variables[0].decl.name, "g_total");
        assert_eq!(e.variables[0].type_text, "int");
        assert_eq!(e.functions[0].decl.name, "run");
    }

    #[test]
    fn typedefs_and_aliases() {
        let e = parse("typedef void (*Callback)(int);\nusing Size = unsigned long;\ntypedef struct { int x; } Anon;\n");
        let names: Vec<&str> = e.typedefs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Callback", "Size", "Anon"]);
        assert_eq!(e.structs.len(), 1);
        assert_eq!(e.structs[0].decl.name, "");
    }

    #[test]
    fn templates_and_extern_blocks_are_entered() {
        let src = r#"
template <typename T>
class Box { T m_value; };
extern "C" {
void c_entry(void);
}
"#;
        let e = parse(src);
        assert_eq!(e.classes[0].decl.name, "Box");
        assert_eq!(e.functions[0].decl.name, "c_entry");
    }

    #[test]
    fn member_function_pointer_parameter_has_empty_name() {
        let e = parse("class Button { void bind(void (Button::*handler)(int)); };\n");
        let bind = &e.classes[0].methods[0];
        assert_eq!(bind.decl.name, "bind");
        for p in bind.parameters.iter().filter(|p| p.raw.contains("::*")) {
            assert!(p.name.is_empty(), "{p:?}");
        }
    }

    #[test]
    fn enums_with_values() {
        let e = parse("enum Color {\n  Red,\n  Green = 2\n};\n");
        assert_eq!(e.enums.len(), 1);
        assert_eq!(e.enums[0].decl.name, "Color");
        assert_eq!(e.enums[0].values[1].name, "Green");
        assert_eq!(e.enums[0].values[1].line, 3);
    }

    #[test]
    fn handles_known_extensions() {
        let p = CppParser::new();
        assert!(p.handles(std::path::Path::new("src/widget.hpp")));
        assert!(p.handles(std::path::Path::new("main.c")));
        assert!(!p.handles(std::path::Path::new("main.rs")));
        assert_eq!(p.language_id(), "cpp");
    }
}
