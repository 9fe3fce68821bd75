//! Compilation of a schema tree into a validation procedure.
//!
//! The tree is walked exactly once. Every node becomes an [`Instruction`]
//! with its messages already rendered, its constraints resolved into bound
//! tests, and its hooks replaced by registry indices. Validation then runs
//! the instruction tree without looking at the schema again.

use std::collections::HashSet;
use std::fmt::Write;

use tracing::{debug, warn};

use crate::error::CompileError;
use crate::registry::HookRegistry;
use crate::schema::{
    Constraint, Items, Kind, MessageArgs, Node, Property, Schema, Test, Unresolved,
};
use crate::validator::Validator;

/// One node of a compiled procedure.
#[derive(Debug)]
pub(crate) struct Instruction {
    pub(crate) kind: Kind,
    pub(crate) optional: bool,
    /// Message for a failed structural check or a missing required value.
    pub(crate) type_message: String,
    /// Bound checks in declaration order; the first failure wins.
    pub(crate) bounds: Vec<Bound>,
    pub(crate) children: Children,
    pub(crate) catch: Option<usize>,
    pub(crate) finally: Option<usize>,
}

#[derive(Debug)]
pub(crate) struct Bound {
    pub(crate) test: Test,
    pub(crate) message: String,
    pub(crate) code: &'static str,
}

#[derive(Debug)]
pub(crate) enum Children {
    Leaf,
    Each(Box<Instruction>),
    Tuple(Vec<Instruction>),
    Fields {
        fields: Vec<(String, Instruction)>,
        allowed: HashSet<String>,
    },
}

/// Compiles `schema` into a standalone validator.
pub(crate) fn compile(schema: &Schema) -> Result<Validator, CompileError> {
    let mut compiler = Compiler::default();
    match compiler.node(schema) {
        Ok(root) => {
            debug!(
                kind = %schema.kind(),
                hooks = compiler.hooks.len(),
                "compiled validation procedure"
            );
            Ok(Validator::new(root, compiler.hooks))
        }
        Err(error) => {
            warn!(%error, "schema failed to compile");
            Err(error)
        }
    }
}

#[derive(Default)]
struct Compiler {
    hooks: HookRegistry,
    properties: Vec<Property>,
}

impl Compiler {
    fn node(&mut self, schema: &Schema) -> Result<Instruction, CompileError> {
        let kind = schema.kind();
        let type_message = match &schema.config.type_message {
            Some(message) => message.render(&MessageArgs {
                property: self.properties.last(),
                kind,
                limit: None,
            }),
            None => kind.default_message().to_string(),
        };

        let bounds = schema
            .config
            .constraints
            .iter()
            .map(|constraint| self.bound(constraint, kind))
            .collect::<Result<Vec<_>, _>>()?;

        let catch = schema.config.catch.clone().map(|hook| self.hooks.register(hook));
        let finally = schema
            .config
            .finally
            .clone()
            .map(|hook| self.hooks.register(hook));

        let children = match &schema.node {
            Node::Array(Items::Each(item)) => {
                Children::Each(Box::new(self.child(Property::Each, item)?))
            }
            Node::Array(Items::Tuple(items)) => Children::Tuple(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.child(Property::Index(index), item))
                    .collect::<Result<_, _>>()?,
            ),
            Node::Object(properties) => {
                let fields = properties
                    .iter()
                    .map(|(name, property)| {
                        let compiled = self.child(Property::Key(name.clone()), property)?;
                        Ok((name.clone(), compiled))
                    })
                    .collect::<Result<Vec<_>, CompileError>>()?;
                Children::Fields {
                    fields,
                    allowed: properties.keys().cloned().collect(),
                }
            }
            Node::Boolean | Node::Number(_) | Node::String | Node::Any => Children::Leaf,
        };

        Ok(Instruction {
            kind,
            optional: schema.optional,
            type_message,
            bounds,
            children,
            catch,
            finally,
        })
    }

    fn child(&mut self, property: Property, schema: &Schema) -> Result<Instruction, CompileError> {
        self.properties.push(property);
        let compiled = self.node(schema);
        self.properties.pop();
        compiled
    }

    fn bound(&self, constraint: &Constraint, kind: Kind) -> Result<Bound, CompileError> {
        if let Constraint::Range { min, max, .. } = constraint {
            if min > max {
                return Err(CompileError::InvertedRange {
                    min: *min,
                    max: *max,
                    path: self.path(),
                });
            }
        }

        let (test, default_message) = constraint.resolve(kind).map_err(|reason| match reason {
            Unresolved::Unsupported => CompileError::UnsupportedConstraint {
                constraint: constraint.name(),
                kind,
                path: self.path(),
            },
            Unresolved::LiteralMismatch => CompileError::LiteralMismatch {
                constraint: constraint.name(),
                kind,
                literal: constraint.limit().to_string(),
                path: self.path(),
            },
        })?;

        let message = match constraint.message() {
            Some(message) => {
                let limit = constraint.limit();
                message.render(&MessageArgs {
                    property: self.properties.last(),
                    kind,
                    limit: Some(&limit),
                })
            }
            None => default_message,
        };

        Ok(Bound {
            test,
            message,
            code: constraint.name(),
        })
    }

    /// Static location of the node being compiled; `[*]` stands for any
    /// element of a homogeneous array.
    fn path(&self) -> String {
        if self.properties.is_empty() {
            return crate::path::ROOT.to_string();
        }
        let mut out = String::new();
        for property in &self.properties {
            match property {
                Property::Key(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Property::Index(index) => {
                    let _ = write!(out, "[{}]", index);
                }
                Property::Each => out.push_str("[*]"),
            }
        }
        out
    }
}
