//! Rebuilding the in-memory model from wire objects
//!
//! Reflections keep the ids they were encoded with, so references encoded
//! as ids resolve against the rebuilt project without any remapping.

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::literal::{LiteralValue, PseudoBigInt};
use crate::package_path::ExternalName;
use crate::project::Project;
use crate::reference::ReferenceType;
use crate::reflection::{
    DeclarationReflection, ParameterReflection, Reflection, ReflectionCategory, ReflectionFlags,
    ReflectionId, ReflectionKind, ReflectionVariant, SignatureReflection, TypeParameterReflection,
};
use crate::types::{
    ArrayType, ConditionalType, IndexedAccessType, MappedType, NamedTupleMember, OptionalType,
    PredicateType, RestType, TemplateLiteralType, Type,
};

use super::schema::{CategoryObject, LiteralObject, ReflectionObject, SomeType};

/// Decodes wire objects into one project
pub struct Deserializer<'p> {
    project: &'p mut Project,
}

impl<'p> Deserializer<'p> {
    pub fn new(project: &'p mut Project) -> Self {
        Self { project }
    }

    /// Rebuild a whole project from its root object
    pub fn project_from_object(object: ReflectionObject) -> Result<Project, CoreError> {
        let kind = ReflectionKind::try_from(object.kind)?;
        if kind != ReflectionKind::Project {
            return Err(CoreError::KindMismatch {
                kind,
                expected: "project",
            });
        }

        let mut project = Project::new(object.name);
        let mut de = Deserializer::new(&mut project);
        for child in object.children.unwrap_or_default() {
            let id = de.declaration_from_object(child, None)?;
            de.project.push_top_level(id);
        }
        let categories = de.categories(object.categories);
        project.categories = categories;

        debug!(name = %project.name, reflections = project.len(), "decoded project");
        Ok(project)
    }

    /// Decode a declaration and everything it owns
    pub fn declaration_from_object(
        &mut self,
        object: ReflectionObject,
        parent: Option<ReflectionId>,
    ) -> Result<ReflectionId, CoreError> {
        let id = object.id;
        let mut decl = DeclarationReflection {
            type_parameters: self.type_parameters(object.type_parameters, id)?,
            ty: self.optional_type(object.ty)?,
            default_value: object.default_value,
            overwrites: self.optional_reference(object.overwrites)?,
            inherited_from: self.optional_reference(object.inherited_from)?,
            implementation_of: self.optional_reference(object.implementation_of)?,
            has_own_document: object.has_own_document,
            ..Default::default()
        };
        for signature in object.signatures.unwrap_or_default() {
            decl.signatures.push(self.signature_from_object(signature, id)?);
        }
        decl.index_signature = self.boxed_signature(object.index_signature, id)?;
        decl.get_signature = self.boxed_signature(object.get_signature, id)?;
        decl.set_signature = self.boxed_signature(object.set_signature, id)?;
        for child in object.children.unwrap_or_default() {
            decl.children.push(self.declaration_from_object(child, Some(id))?);
        }
        decl.categories = self.categories(object.categories);

        self.finish(
            id,
            object.name,
            object.kind,
            parent,
            object.flags,
            ReflectionVariant::Declaration(decl),
        )
    }

    pub fn signature_from_object(
        &mut self,
        object: ReflectionObject,
        parent: ReflectionId,
    ) -> Result<ReflectionId, CoreError> {
        let id = object.id;
        let mut sig = SignatureReflection {
            type_parameters: self.type_parameters(object.type_parameters, id)?,
            ..Default::default()
        };
        for param in object.parameters.unwrap_or_default() {
            sig.parameters.push(self.parameter_from_object(param, id)?);
        }
        sig.ty = self.optional_type(object.ty)?;
        sig.overwrites = self.optional_reference(object.overwrites)?;
        sig.inherited_from = self.optional_reference(object.inherited_from)?;
        sig.implementation_of = self.optional_reference(object.implementation_of)?;

        self.finish(
            id,
            object.name,
            object.kind,
            Some(parent),
            object.flags,
            ReflectionVariant::Signature(sig),
        )
    }

    fn parameter_from_object(
        &mut self,
        object: ReflectionObject,
        parent: ReflectionId,
    ) -> Result<ReflectionId, CoreError> {
        let param = ParameterReflection {
            ty: self.optional_type(object.ty)?,
            default_value: object.default_value,
        };
        self.finish(
            object.id,
            object.name,
            object.kind,
            Some(parent),
            object.flags,
            ReflectionVariant::Parameter(param),
        )
    }

    fn type_parameters(
        &mut self,
        objects: Option<Vec<ReflectionObject>>,
        parent: ReflectionId,
    ) -> Result<Vec<ReflectionId>, CoreError> {
        let mut ids = Vec::new();
        for object in objects.unwrap_or_default() {
            let param = TypeParameterReflection::new(
                self.optional_type(object.ty)?,
                self.optional_type(object.default)?,
            );
            ids.push(self.finish(
                object.id,
                object.name,
                object.kind,
                Some(parent),
                object.flags,
                ReflectionVariant::TypeParameter(param),
            )?);
        }
        Ok(ids)
    }

    fn boxed_signature(
        &mut self,
        object: Option<Box<ReflectionObject>>,
        parent: ReflectionId,
    ) -> Result<Option<ReflectionId>, CoreError> {
        object
            .map(|object| self.signature_from_object(*object, parent))
            .transpose()
    }

    fn finish(
        &mut self,
        id: ReflectionId,
        name: String,
        kind: u32,
        parent: Option<ReflectionId>,
        flags: ReflectionFlags,
        variant: ReflectionVariant,
    ) -> Result<ReflectionId, CoreError> {
        let reflection = Reflection {
            id,
            name,
            kind: ReflectionKind::try_from(kind)?,
            parent,
            flags,
            variant,
        };
        self.project.insert_decoded(reflection)?;
        Ok(id)
    }

    /// Category members that were not decoded are dropped
    fn categories(&self, objects: Option<Vec<CategoryObject>>) -> Vec<ReflectionCategory> {
        objects
            .unwrap_or_default()
            .into_iter()
            .map(|object| {
                let mut category = ReflectionCategory::new(object.title);
                for child in object.children.unwrap_or_default() {
                    if self.project.contains(child) {
                        category.children.push(child);
                    } else {
                        warn!(
                            id = %child,
                            title = %category.title,
                            "omitting unknown category child"
                        );
                    }
                }
                category
            })
            .collect()
    }

    fn optional_type(&mut self, object: Option<SomeType>) -> Result<Option<Type>, CoreError> {
        object.map(|o| self.type_from_object(o)).transpose()
    }

    fn optional_reference(
        &mut self,
        object: Option<SomeType>,
    ) -> Result<Option<ReferenceType>, CoreError> {
        object.map(|o| self.reference_from_object(o)).transpose()
    }

    fn boxed(&mut self, object: Box<SomeType>) -> Result<Box<Type>, CoreError> {
        self.type_from_object(*object).map(Box::new)
    }

    fn types(&mut self, objects: Vec<SomeType>) -> Result<Vec<Type>, CoreError> {
        objects
            .into_iter()
            .map(|o| self.type_from_object(o))
            .collect()
    }

    /// Decode an object that must be a reference
    pub fn reference_from_object(&mut self, object: SomeType) -> Result<ReferenceType, CoreError> {
        match object {
            SomeType::Reference {
                id,
                type_arguments,
                name,
                qualified_name,
                package,
            } => {
                let target = id.unwrap_or(ReflectionId::BROKEN);
                let mut reference = ReferenceType::resolved(name, target)
                    .with_type_arguments(self.types(type_arguments.unwrap_or_default())?);
                if let (Some(qualified_name), Some(package)) = (qualified_name, package) {
                    reference = reference.with_external(ExternalName::new(qualified_name, package));
                }
                Ok(reference)
            }
            other => Err(CoreError::UnexpectedType {
                expected: "reference",
                found: other.kind(),
            }),
        }
    }

    pub fn type_from_object(&mut self, object: SomeType) -> Result<Type, CoreError> {
        let ty = match object {
            SomeType::Array { element_type } => Type::Array(ArrayType {
                element_type: self.boxed(element_type)?,
            }),
            SomeType::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => Type::Conditional(ConditionalType {
                check_type: self.boxed(check_type)?,
                extends_type: self.boxed(extends_type)?,
                true_type: self.boxed(true_type)?,
                false_type: self.boxed(false_type)?,
            }),
            SomeType::IndexedAccess {
                index_type,
                object_type,
            } => Type::IndexedAccess(IndexedAccessType {
                object_type: self.boxed(object_type)?,
                index_type: self.boxed(index_type)?,
            }),
            SomeType::Inferred { name } => Type::inferred(name),
            SomeType::Intersection { types } => Type::intersection(self.types(types)?),
            SomeType::Intrinsic { name } => Type::intrinsic(name),
            SomeType::Literal { value } => Type::literal(literal_from_object(value)?),
            SomeType::Mapped {
                parameter,
                parameter_type,
                template_type,
                readonly_modifier,
                optional_modifier,
                name_type,
            } => Type::Mapped(MappedType {
                parameter,
                parameter_type: self.boxed(parameter_type)?,
                template_type: self.boxed(template_type)?,
                readonly_modifier,
                optional_modifier,
                name_type: name_type.map(|n| self.boxed(n)).transpose()?,
            }),
            SomeType::Optional { element_type } => Type::Optional(OptionalType {
                element_type: self.boxed(element_type)?,
            }),
            SomeType::Predicate {
                name,
                asserts,
                target_type,
            } => Type::Predicate(PredicateType {
                name,
                asserts,
                target_type: target_type.map(|t| self.boxed(t)).transpose()?,
            }),
            SomeType::Query { query_type } => Type::query(self.reference_from_object(*query_type)?),
            reference @ SomeType::Reference { .. } => {
                Type::Reference(self.reference_from_object(reference)?)
            }
            SomeType::Reflection { declaration } => {
                Type::reflection(self.declaration_from_object(*declaration, None)?)
            }
            SomeType::Rest { element_type } => Type::Rest(RestType {
                element_type: self.boxed(element_type)?,
            }),
            SomeType::TemplateLiteral { head, tail } => {
                let tail = tail
                    .into_iter()
                    .map(|(ty, text)| Ok((self.type_from_object(ty)?, text)))
                    .collect::<Result<_, CoreError>>()?;
                Type::TemplateLiteral(TemplateLiteralType { head, tail })
            }
            SomeType::Tuple { elements } => Type::tuple(self.types(elements.unwrap_or_default())?),
            SomeType::NamedTupleMember {
                name,
                is_optional,
                element,
            } => Type::NamedTupleMember(NamedTupleMember {
                name,
                is_optional,
                element: self.boxed(element)?,
            }),
            SomeType::TypeOperator { target, operator } => {
                Type::type_operator(operator, self.type_from_object(*target)?)
            }
            SomeType::Union { types } => Type::union(self.types(types)?),
            SomeType::Unknown { name } => Type::unknown(name),
        };
        Ok(ty)
    }
}

pub(crate) fn literal_from_object(object: LiteralObject) -> Result<LiteralValue, CoreError> {
    let value = match object {
        LiteralObject::Null => LiteralValue::Null,
        LiteralObject::Bool(b) => LiteralValue::Bool(b),
        LiteralObject::Number(n) => LiteralValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        LiteralObject::String(s) => LiteralValue::String(s),
        LiteralObject::BigInt { value, negative } => {
            LiteralValue::BigInt(PseudoBigInt::new(negative, &value)?)
        }
    };
    Ok(value)
}
