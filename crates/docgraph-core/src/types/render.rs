//! Source-syntax rendering of type expressions

use std::fmt;

use super::{MappedModifier, Type, CONDITIONAL_CHECK_BINDING_POWER};
use crate::project::Project;

/// Renders a [`Type`] in source syntax, resolving names against a project
///
/// References print the current name of the reflection they resolve to, or
/// their stored name when they do not resolve.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    project: &'a Project,
}

impl Type {
    pub fn display<'a>(&'a self, project: &'a Project) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, project }
    }

    pub fn render(&self, project: &Project) -> String {
        self.display(project).to_string()
    }
}

impl<'a> TypeDisplay<'a> {
    fn child(&self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay {
            ty,
            project: self.project,
        }
    }

    /// Write `ty`, parenthesized if it binds looser than `power`
    fn wrap(&self, f: &mut fmt::Formatter<'_>, ty: &'a Type, power: i32) -> fmt::Result {
        if ty.binding_power() < power {
            write!(f, "({})", self.child(ty))
        } else {
            write!(f, "{}", self.child(ty))
        }
    }

    fn join(
        &self,
        f: &mut fmt::Formatter<'_>,
        types: &'a [Type],
        sep: &str,
        power: i32,
    ) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            self.wrap(f, ty, power)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Array(array) => {
                self.wrap(f, &array.element_type, self.ty.binding_power())?;
                f.write_str("[]")
            }
            Type::Conditional(cond) => {
                self.wrap(f, &cond.check_type, CONDITIONAL_CHECK_BINDING_POWER)?;
                write!(
                    f,
                    " extends {} ? {} : {}",
                    self.child(&cond.extends_type),
                    self.child(&cond.true_type),
                    self.child(&cond.false_type)
                )
            }
            Type::IndexedAccess(access) => write!(
                f,
                "{}[{}]",
                self.child(&access.object_type),
                self.child(&access.index_type)
            ),
            Type::Inferred(inferred) => write!(f, "infer {}", inferred.name),
            Type::Intersection(intersection) => {
                self.join(f, &intersection.types, " & ", self.ty.binding_power())
            }
            Type::Intrinsic(intrinsic) => f.write_str(&intrinsic.name),
            Type::Literal(literal) => write!(f, "{}", literal.value),
            Type::Mapped(mapped) => {
                let read = match mapped.readonly_modifier {
                    Some(MappedModifier::Add) => "readonly ",
                    Some(MappedModifier::Remove) => "-readonly ",
                    None => "",
                };
                let opt = match mapped.optional_modifier {
                    Some(MappedModifier::Add) => "?",
                    Some(MappedModifier::Remove) => "-?",
                    None => "",
                };
                write!(
                    f,
                    "{{ {}[{} in {}",
                    read,
                    mapped.parameter,
                    self.child(&mapped.parameter_type)
                )?;
                if let Some(name_type) = &mapped.name_type {
                    write!(f, " as {}", self.child(name_type))?;
                }
                write!(f, "]{}: {} }}", opt, self.child(&mapped.template_type))
            }
            Type::Optional(optional) => {
                self.wrap(f, &optional.element_type, self.ty.binding_power())?;
                f.write_str("?")
            }
            Type::Predicate(predicate) => {
                if predicate.asserts {
                    f.write_str("asserts ")?;
                }
                f.write_str(&predicate.name)?;
                if let Some(target) = &predicate.target_type {
                    write!(f, " is {}", self.child(target))?;
                }
                Ok(())
            }
            Type::Query(query) => {
                f.write_str("typeof ")?;
                query.query_type.fmt_with(f, self.project)
            }
            Type::Reference(reference) => reference.fmt_with(f, self.project),
            Type::Reflection(reflection) => {
                let is_function = self
                    .project
                    .get(reflection.declaration)
                    .and_then(|r| r.as_declaration())
                    .map_or(false, |decl| decl.children.is_empty() && !decl.signatures.is_empty());
                f.write_str(if is_function { "Function" } else { "Object" })
            }
            Type::Rest(rest) => {
                f.write_str("...")?;
                self.wrap(f, &rest.element_type, self.ty.binding_power())
            }
            Type::TemplateLiteral(template) => {
                write!(f, "`{}", template.head)?;
                for (ty, text) in &template.tail {
                    write!(f, "${{{}}}{}", self.child(ty), text)?;
                }
                f.write_str("`")
            }
            Type::Tuple(tuple) => {
                f.write_str("[")?;
                self.join(f, &tuple.elements, ", ", i32::MIN)?;
                f.write_str("]")
            }
            Type::NamedTupleMember(member) => write!(
                f,
                "{}{}: {}",
                member.name,
                if member.is_optional { "?" } else { "" },
                self.child(&member.element)
            ),
            Type::TypeOperator(op) => {
                write!(f, "{} {}", op.operator.as_str(), self.child(&op.target))
            }
            Type::Union(union) => self.join(f, union.types(), " | ", self.ty.binding_power()),
            Type::Unknown(unknown) => f.write_str(&unknown.name),
        }
    }
}
