//! Per-kind naming policy over one file's declarations.

use std::borrow::Cow;
use std::path::Path;

use crate::config::{ConfigError, RuleTable};
use crate::entity::{Declaration, Enum, Function, Parameter, Record, RecordStyle, SourceEntities};
use crate::error::ValidationError;
use crate::kind::ConstructKind;
use crate::macros::MacroDefine;
use crate::matcher::{NameMatcher, NameSource};
use crate::names;
use crate::scanner;

type Outcome = Result<(), ValidationError>;

/// Validates declarations against a rule table.
///
/// Entities are processed in a fixed order (filename, macros, free
/// functions, classes, structs, enums, variables, namespaces, typedefs) and
/// the first mismatch ends the pass.
#[derive(Debug)]
pub struct Validator {
    matcher: NameMatcher,
}

impl Validator {
    /// Builds a validator, compiling every resolved rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a resolved pattern is not a valid regex.
    pub fn new(table: &RuleTable) -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: NameMatcher::new(table)?,
        })
    }

    /// Validates one file.
    ///
    /// `source` is the file's text, used to recover function bodies for the
    /// local variable check.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self, filename: &str, entities: &SourceEntities, source: &str) -> Outcome {
        Pass {
            matcher: &self.matcher,
            filename,
            entities,
            source,
            trail: Vec::new(),
        }
        .run()
    }
}

struct Pass<'a> {
    matcher: &'a NameMatcher,
    filename: &'a str,
    entities: &'a SourceEntities,
    source: &'a str,
    trail: Vec<String>,
}

impl Pass<'_> {
    fn run(&mut self) -> Outcome {
        let entities = self.entities;

        self.check_filename()?;

        tracing::debug!("checking {} macros", entities.defines.len());
        for define in &entities.defines {
            self.check_macro(&define.text, define.line)?;
        }

        tracing::debug!("checking {} functions", entities.functions.len());
        for function in &entities.functions {
            self.check_function(function)?;
        }

        tracing::debug!(
            "checking {} classes and {} structs",
            entities.classes.len(),
            entities.structs.len()
        );
        for record in entities.classes.iter().chain(&entities.structs) {
            self.check_record(record)?;
        }

        for e in &entities.enums {
            self.check_enum(e)?;
        }

        tracing::debug!("checking {} variables", entities.variables.len());
        for variable in &entities.variables {
            let type_text = variable.type_text.trim();
            if matches!(type_text, "return" | "class" | "struct" | "union") {
                continue;
            }
            let kind = if variable.is_static {
                ConstructKind::StaticVariant
            } else {
                ConstructKind::GlobalVariant
            };
            self.check(NameSource::Entity(&variable.decl), kind)?;
        }

        for namespace in &entities.namespaces {
            self.check(
                NameSource::literal(&namespace.name, namespace.line),
                ConstructKind::Namespace,
            )?;
        }

        for typedef in &entities.typedefs {
            self.check_typedef(typedef)?;
        }

        Ok(())
    }

    fn check(&self, source: NameSource<'_>, kind: ConstructKind) -> Outcome {
        self.matcher.check(self.filename, source, kind, &self.trail)
    }

    fn scoped(&mut self, label: String, f: impl FnOnce(&mut Self) -> Outcome) -> Outcome {
        self.trail.push(label);
        let outcome = f(self);
        self.trail.pop();
        outcome
    }

    fn check_filename(&self) -> Outcome {
        let path = Path::new(self.filename);
        let basename: Cow<'_, str> = path
            .file_name()
            .map_or(Cow::Borrowed(self.filename), |n| n.to_string_lossy());
        self.check(NameSource::literal(&basename, 1), ConstructKind::Filename)
    }

    fn check_macro(&mut self, text: &str, line: usize) -> Outcome {
        let Some(define) = MacroDefine::parse(text, line) else {
            tracing::trace!("unparseable macro at line {line}");
            return Ok(());
        };

        self.scoped(format!("define {}", define.name), |pass| match &define.parameters {
            None => pass.check(
                NameSource::literal(&define.name, define.line),
                ConstructKind::Define,
            ),
            Some(parameters) => {
                pass.check(
                    NameSource::literal(&define.name, define.line),
                    ConstructKind::DefineFunction,
                )?;
                for p in parameters {
                    pass.check(
                        NameSource::literal(&p.name, p.line),
                        ConstructKind::DefineFunctionArgument,
                    )?;
                }
                Ok(())
            }
        })
    }

    fn check_function(&mut self, function: &Function) -> Outcome {
        let Some(scope) = function.scope.as_deref() else {
            return self.check_free_function(function);
        };

        let owner = names::last_token(names::base_name(scope));
        if self.entities.has_namespace(owner) {
            return self.check_free_function(function);
        }
        let is_struct = self
            .entities
            .find_record(owner)
            .is_some_and(|r| r.style != RecordStyle::Class);
        self.check_method(function, owner, is_struct)
    }

    /// Free operator overloads skip the name check like operator methods.
    ///
    /// A templated name is recovered from its raw text; when that fails the
    /// name is skipped whatever the return type, since a literal `<...>`
    /// can never satisfy a name rule.
    fn check_free_function(&mut self, function: &Function) -> Outcome {
        if names::last_token(&function.decl.name) == "main" {
            return Ok(());
        }

        self.scoped(format!("function {}", function.decl.name), |pass| {
            if !names::is_operator_name(&function.decl.name) {
                pass.check(NameSource::Entity(&function.decl), ConstructKind::Function)?;
            }
            pass.check_parameters(&function.parameters, ConstructKind::FunctionArgument)?;
            pass.check_locals(&function.decl)
        })
    }

    fn check_method(&mut self, method: &Function, owner: &str, is_struct: bool) -> Outcome {
        let (kind, argument_kind) = if is_struct {
            (ConstructKind::StructMethod, ConstructKind::StructMethodArgument)
        } else {
            (ConstructKind::ClassMethod, ConstructKind::ClassMethodArgument)
        };

        self.scoped(format!("method {}", method.decl.name), |pass| {
            if let Some(typedef) = names::function_pointer_typedef(&method.decl.raw) {
                return pass.check(
                    NameSource::literal(&typedef, method.decl.line),
                    ConstructKind::Typedef,
                );
            }

            let name = &method.decl.name;
            let is_special = names::is_operator_name(name)
                || names::base_name(names::last_token(name))
                    .trim_start_matches('~')
                    .trim()
                    == owner;
            if !is_special {
                pass.check(NameSource::Entity(&method.decl), kind)?;
            }

            pass.check_parameters(&method.parameters, argument_kind)?;
            pass.check_locals(&method.decl)
        })
    }

    fn check_parameters(&self, parameters: &[Parameter], kind: ConstructKind) -> Outcome {
        for p in parameters {
            let functor = names::functor_parameter_name(&p.raw)
                .or_else(|| names::functor_parameter_name(&p.type_text));

            let (name, is_member_pointer) = if p.name.trim().is_empty() {
                match functor {
                    Some(found) => found,
                    None => continue,
                }
            } else {
                let is_member = functor.is_some_and(|(_, member)| member);
                (p.name.clone(), is_member)
            };

            let outcome = self.check(NameSource::literal(&name, p.line), kind);
            if outcome.is_err() && is_member_pointer {
                self.check(
                    NameSource::literal(&name, p.line),
                    ConstructKind::DefineFunction,
                )?;
                continue;
            }
            outcome?;
        }
        Ok(())
    }

    fn check_locals(&self, decl: &Declaration) -> Outcome {
        let Some(body) = scanner::find_body(self.source, decl.line, &decl.name) else {
            return Ok(());
        };
        for (name, offset) in scanner::extract_local_variable_names(body.text) {
            self.check(
                NameSource::literal(&name, body.start_line + offset),
                ConstructKind::Variant,
            )?;
        }
        Ok(())
    }

    fn check_record(&mut self, record: &Record) -> Outcome {
        let (keyword, kind) = match record.style {
            RecordStyle::Class => ("class", ConstructKind::Class),
            RecordStyle::Struct => ("struct", ConstructKind::Struct),
            RecordStyle::Union => ("union", ConstructKind::Union),
        };
        let is_struct = record.style != RecordStyle::Class;
        let owner = names::last_token(names::base_name(&record.decl.name)).to_string();

        self.scoped(format!("{keyword} {}", record.decl.name), |pass| {
            pass.check(NameSource::Entity(&record.decl), kind)?;

            for method in &record.methods {
                pass.check_method(method, &owner, is_struct)?;
            }

            for member in &record.members {
                let kind = if member.is_static {
                    ConstructKind::StaticVariant
                } else if is_struct {
                    ConstructKind::StructVariant
                } else {
                    ConstructKind::ClassVariant
                };
                pass.check(NameSource::Entity(&member.decl), kind)?;
            }

            for nested in &record.nested {
                pass.check_record(nested)?;
            }
            for e in &record.enums {
                pass.check_enum(e)?;
            }
            for typedef in &record.typedefs {
                pass.check_typedef(typedef)?;
            }
            Ok(())
        })
    }

    fn check_enum(&mut self, e: &Enum) -> Outcome {
        self.scoped(format!("enum {}", e.decl.name), |pass| {
            pass.check(NameSource::Entity(&e.decl), ConstructKind::Enum)?;
            for value in &e.values {
                pass.check(
                    NameSource::literal(&value.name, value.line),
                    ConstructKind::EnumValue,
                )?;
            }
            Ok(())
        })
    }

    fn check_typedef(&self, typedef: &Declaration) -> Outcome {
        match names::function_pointer_typedef(&typedef.raw) {
            Some(name) => self.check(
                NameSource::literal(&name, typedef.line),
                ConstructKind::Typedef,
            ),
            None => self.check(NameSource::Entity(typedef), ConstructKind::Typedef),
        }
    }
}
