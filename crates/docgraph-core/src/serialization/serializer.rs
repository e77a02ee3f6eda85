//! Encoding the in-memory model into wire objects

use crate::config::SerializerConfig;
use crate::error::CoreError;
use crate::literal::LiteralValue;
use crate::project::Project;
use crate::reference::ReferenceType;
use crate::reflection::{
    Reflection, ReflectionCategory, ReflectionId, ReflectionKind, ReflectionVariant,
};
use crate::types::Type;

use super::schema::{non_empty, CategoryObject, LiteralObject, ReflectionObject, SomeType};

/// Largest integer a JSON number holds exactly as a double
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encodes types and reflections of one project
pub struct Serializer<'p> {
    project: &'p Project,
    config: SerializerConfig,
}

impl<'p> Serializer<'p> {
    pub fn new(project: &'p Project, config: SerializerConfig) -> Self {
        Self { project, config }
    }

    /// The project root as id 0 with its top-level children and categories
    pub fn project_to_object(&self) -> Result<ReflectionObject, CoreError> {
        let project = self.project;
        let mut object = ReflectionObject::new(
            ReflectionId::PROJECT,
            project.name.clone(),
            ReflectionKind::Project.bits(),
        );
        if self.config.kind_strings {
            object.kind_string = Some(ReflectionKind::Project.kind_string());
        }
        object.children = self.reflections(project.children())?;
        object.categories = self.categories(&project.categories);
        Ok(object)
    }

    pub fn reflection_to_object(&self, id: ReflectionId) -> Result<ReflectionObject, CoreError> {
        let reflection = self
            .project
            .get(id)
            .ok_or(CoreError::UnknownReflection(id))?;
        self.encode_reflection(reflection)
    }

    fn encode_reflection(&self, reflection: &Reflection) -> Result<ReflectionObject, CoreError> {
        let mut object =
            ReflectionObject::new(reflection.id, reflection.name.clone(), reflection.kind.bits());
        if self.config.kind_strings {
            object.kind_string = Some(reflection.kind.kind_string());
        }
        object.flags = reflection.flags;

        match &reflection.variant {
            ReflectionVariant::Declaration(decl) => {
                object.type_parameters = self.reflections(&decl.type_parameters)?;
                object.ty = self.optional_type(decl.ty.as_ref())?;
                object.default_value = decl.default_value.clone();
                object.overwrites = self.optional_reference(decl.overwrites.as_ref())?;
                object.inherited_from = self.optional_reference(decl.inherited_from.as_ref())?;
                object.implementation_of =
                    self.optional_reference(decl.implementation_of.as_ref())?;
                object.signatures = self.reflections(&decl.signatures)?;
                object.index_signature = self.boxed_reflection(decl.index_signature)?;
                object.get_signature = self.boxed_reflection(decl.get_signature)?;
                object.set_signature = self.boxed_reflection(decl.set_signature)?;
                object.children = self.reflections(&decl.children)?;
                object.categories = self.categories(&decl.categories);
                object.has_own_document = decl.has_own_document;
            }
            ReflectionVariant::Signature(sig) => {
                object.type_parameters = self.reflections(&sig.type_parameters)?;
                object.parameters = self.reflections(&sig.parameters)?;
                object.ty = self.optional_type(sig.ty.as_ref())?;
                object.overwrites = self.optional_reference(sig.overwrites.as_ref())?;
                object.inherited_from = self.optional_reference(sig.inherited_from.as_ref())?;
                object.implementation_of =
                    self.optional_reference(sig.implementation_of.as_ref())?;
            }
            ReflectionVariant::Parameter(param) => {
                object.ty = self.optional_type(param.ty.as_ref())?;
                object.default_value = param.default_value.clone();
            }
            ReflectionVariant::TypeParameter(param) => {
                object.ty = self.optional_type(param.ty.as_ref())?;
                object.default = self.optional_type(param.default.as_ref())?;
            }
        }
        Ok(object)
    }

    fn reflections(
        &self,
        ids: &[ReflectionId],
    ) -> Result<Option<Vec<ReflectionObject>>, CoreError> {
        let objects = ids
            .iter()
            .map(|id| self.reflection_to_object(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(non_empty(objects))
    }

    fn boxed_reflection(
        &self,
        id: Option<ReflectionId>,
    ) -> Result<Option<Box<ReflectionObject>>, CoreError> {
        id.map(|id| self.reflection_to_object(id).map(Box::new))
            .transpose()
    }

    fn categories(&self, categories: &[ReflectionCategory]) -> Option<Vec<CategoryObject>> {
        non_empty(
            categories
                .iter()
                .map(|category| CategoryObject {
                    title: category.title.clone(),
                    children: non_empty(category.children.clone()),
                })
                .collect(),
        )
    }

    fn optional_type(&self, ty: Option<&Type>) -> Result<Option<SomeType>, CoreError> {
        ty.map(|ty| self.type_to_object(ty)).transpose()
    }

    fn optional_reference(
        &self,
        reference: Option<&ReferenceType>,
    ) -> Result<Option<SomeType>, CoreError> {
        reference.map(|r| self.reference_to_object(r)).transpose()
    }

    fn boxed(&self, ty: &Type) -> Result<Box<SomeType>, CoreError> {
        self.type_to_object(ty).map(Box::new)
    }

    fn types(&self, types: &[Type]) -> Result<Vec<SomeType>, CoreError> {
        types.iter().map(|t| self.type_to_object(t)).collect()
    }

    /// Encode a reference; the id is present only when the target resolves
    pub fn reference_to_object(&self, reference: &ReferenceType) -> Result<SomeType, CoreError> {
        Ok(SomeType::Reference {
            id: reference.reflection_id(self.project),
            type_arguments: non_empty(self.types(&reference.type_arguments)?),
            name: reference.name.clone(),
            qualified_name: reference.qualified_name().map(str::to_string),
            package: reference.package().map(str::to_string),
        })
    }

    pub fn type_to_object(&self, ty: &Type) -> Result<SomeType, CoreError> {
        let object = match ty {
            Type::Array(t) => SomeType::Array {
                element_type: self.boxed(&t.element_type)?,
            },
            Type::Conditional(t) => SomeType::Conditional {
                check_type: self.boxed(&t.check_type)?,
                extends_type: self.boxed(&t.extends_type)?,
                true_type: self.boxed(&t.true_type)?,
                false_type: self.boxed(&t.false_type)?,
            },
            Type::IndexedAccess(t) => SomeType::IndexedAccess {
                index_type: self.boxed(&t.index_type)?,
                object_type: self.boxed(&t.object_type)?,
            },
            Type::Inferred(t) => SomeType::Inferred {
                name: t.name.clone(),
            },
            Type::Intersection(t) => SomeType::Intersection {
                types: self.types(&t.types)?,
            },
            Type::Intrinsic(t) => SomeType::Intrinsic {
                name: t.name.clone(),
            },
            Type::Literal(t) => SomeType::Literal {
                value: literal_to_object(&t.value),
            },
            Type::Mapped(t) => SomeType::Mapped {
                parameter: t.parameter.clone(),
                parameter_type: self.boxed(&t.parameter_type)?,
                template_type: self.boxed(&t.template_type)?,
                readonly_modifier: t.readonly_modifier,
                optional_modifier: t.optional_modifier,
                name_type: t.name_type.as_deref().map(|n| self.boxed(n)).transpose()?,
            },
            Type::Optional(t) => SomeType::Optional {
                element_type: self.boxed(&t.element_type)?,
            },
            Type::Predicate(t) => SomeType::Predicate {
                name: t.name.clone(),
                asserts: t.asserts,
                target_type: t.target_type.as_deref().map(|n| self.boxed(n)).transpose()?,
            },
            Type::Query(t) => SomeType::Query {
                query_type: Box::new(self.reference_to_object(&t.query_type)?),
            },
            Type::Reference(t) => self.reference_to_object(t)?,
            Type::Reflection(t) => SomeType::Reflection {
                declaration: Box::new(self.reflection_to_object(t.declaration)?),
            },
            Type::Rest(t) => SomeType::Rest {
                element_type: self.boxed(&t.element_type)?,
            },
            Type::TemplateLiteral(t) => SomeType::TemplateLiteral {
                head: t.head.clone(),
                tail: t
                    .tail
                    .iter()
                    .map(|(ty, text)| Ok((self.type_to_object(ty)?, text.clone())))
                    .collect::<Result<_, CoreError>>()?,
            },
            Type::Tuple(t) => SomeType::Tuple {
                elements: non_empty(self.types(&t.elements)?),
            },
            Type::NamedTupleMember(t) => SomeType::NamedTupleMember {
                name: t.name.clone(),
                is_optional: t.is_optional,
                element: self.boxed(&t.element)?,
            },
            Type::TypeOperator(t) => SomeType::TypeOperator {
                target: self.boxed(&t.target)?,
                operator: t.operator,
            },
            Type::Union(t) => SomeType::Union {
                types: self.types(t.types())?,
            },
            Type::Unknown(t) => SomeType::Unknown {
                name: t.name.clone(),
            },
        };
        Ok(object)
    }
}

pub(crate) fn literal_to_object(value: &LiteralValue) -> LiteralObject {
    match value {
        LiteralValue::Null => LiteralObject::Null,
        LiteralValue::Bool(b) => LiteralObject::Bool(*b),
        LiteralValue::Number(n) => number_to_object(*n),
        LiteralValue::String(s) => LiteralObject::String(s.clone()),
        LiteralValue::BigInt(big) => LiteralObject::BigInt {
            value: big.magnitude().to_string(),
            negative: big.is_negative(),
        },
    }
}

fn number_to_object(n: f64) -> LiteralObject {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return LiteralObject::Number(serde_json::Number::from(n as i64));
    }
    // NaN and the infinities have no JSON number form
    serde_json::Number::from_f64(n).map_or(LiteralObject::Null, LiteralObject::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::PseudoBigInt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn encode(project: &Project, ty: &Type) -> serde_json::Value {
        let object = Serializer::new(project, SerializerConfig::default())
            .type_to_object(ty)
            .unwrap();
        serde_json::to_value(object).unwrap()
    }

    #[test]
    fn test_bigint_literal_encoding() {
        let project = Project::new("test");
        let negative = Type::literal(PseudoBigInt::from(-42i64));
        assert_eq!(
            encode(&project, &negative),
            json!({ "type": "literal", "value": { "value": "42", "negative": true } })
        );
        let zero = Type::literal(PseudoBigInt::from(0i64));
        assert_eq!(
            encode(&project, &zero),
            json!({ "type": "literal", "value": { "value": "0", "negative": false } })
        );
    }

    #[test]
    fn test_numbers_keep_integral_form() {
        let project = Project::new("test");
        assert_eq!(
            encode(&project, &Type::literal(3.0)),
            json!({ "type": "literal", "value": 3 })
        );
        assert_eq!(
            encode(&project, &Type::literal(1.5)),
            json!({ "type": "literal", "value": 1.5 })
        );
        assert_eq!(
            encode(&project, &Type::literal(f64::NAN)),
            json!({ "type": "literal", "value": null })
        );
    }

    #[test]
    fn test_empty_tuple_omits_elements() {
        let project = Project::new("test");
        assert_eq!(
            encode(&project, &Type::tuple(vec![])),
            json!({ "type": "tuple" })
        );
    }

    #[test]
    fn test_unresolved_reference_has_no_id() {
        let project = Project::new("test");
        let reference = ReferenceType::broken("Missing");
        assert_eq!(
            encode(&project, &Type::from(reference)),
            json!({ "type": "reference", "name": "Missing" })
        );
    }

    #[test]
    fn test_reflection_type_embeds_declaration() {
        let mut project = Project::new("test");
        let literal = project.add_type_literal(None).unwrap();
        let value = encode(&project, &Type::reflection(literal));
        assert_eq!(
            value,
            json!({
                "type": "reflection",
                "declaration": {
                    "id": literal.0,
                    "name": "__type",
                    "kind": 65536,
                    "kindString": "Type literal"
                }
            })
        );

        let dangling = Serializer::new(&project, SerializerConfig::default())
            .type_to_object(&Type::reflection(ReflectionId(77)));
        assert!(matches!(dangling, Err(CoreError::UnknownReflection(_))));
    }
}
