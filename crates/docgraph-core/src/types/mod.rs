//! Type expressions as a closed algebraic data type
//!
//! Every variant is an immutable value tree. Children are always other `Type`
//! values, with the single exception of [`ReflectionType`], which names an
//! anonymous declaration registered in the owning [`Project`].
//!
//! [`Project`]: crate::project::Project

mod render;
mod visit;

use serde::{Deserialize, Serialize};

use crate::literal::LiteralValue;
use crate::reference::ReferenceType;
use crate::reflection::ReflectionId;

pub use render::TypeDisplay;
pub use visit::{make_recursive_visitor, RecursiveVisitor, TypeCallbacks, TypeVisitor};

/// Binding power of a conditional type's check position
///
/// `A | B extends C ? D : E` must parenthesize the union in check position,
/// so the check type needs a higher power than the conditional itself.
pub const CONDITIONAL_CHECK_BINDING_POWER: i32 = 150;

/// Children with a binding power at or above this are never parenthesized
pub const NEVER_PARENTHESIZE: i32 = 999;

/// Children with this binding power are always parenthesized
pub const ALWAYS_PARENTHESIZE: i32 = -1;

/// Discriminator of a [`Type`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Array,
    Conditional,
    IndexedAccess,
    Inferred,
    Intersection,
    Intrinsic,
    Literal,
    Mapped,
    Optional,
    Predicate,
    Query,
    Reference,
    Reflection,
    Rest,
    TemplateLiteral,
    Tuple,
    NamedTupleMember,
    TypeOperator,
    Union,
    Unknown,
}

impl TypeKind {
    /// The discriminator string used on the wire
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeKind::Array => "array",
            TypeKind::Conditional => "conditional",
            TypeKind::IndexedAccess => "indexedAccess",
            TypeKind::Inferred => "inferred",
            TypeKind::Intersection => "intersection",
            TypeKind::Intrinsic => "intrinsic",
            TypeKind::Literal => "literal",
            TypeKind::Mapped => "mapped",
            TypeKind::Optional => "optional",
            TypeKind::Predicate => "predicate",
            TypeKind::Query => "query",
            TypeKind::Reference => "reference",
            TypeKind::Reflection => "reflection",
            TypeKind::Rest => "rest",
            TypeKind::TemplateLiteral => "template-literal",
            TypeKind::Tuple => "tuple",
            TypeKind::NamedTupleMember => "named-tuple-member",
            TypeKind::TypeOperator => "typeOperator",
            TypeKind::Union => "union",
            TypeKind::Unknown => "unknown",
        }
    }

    /// How tightly this kind binds when rendered inside another type
    ///
    /// A child is wrapped in parentheses when its power is lower than the
    /// power its parent requires.
    pub const fn binding_power(self) -> i32 {
        match self {
            TypeKind::Conditional => 70,
            TypeKind::Union => 100,
            TypeKind::Intersection => 120,
            TypeKind::Query | TypeKind::TypeOperator => 900,
            // The contents are opaque text, so never trust them to bind
            TypeKind::Unknown => ALWAYS_PARENTHESIZE,
            TypeKind::Array
            | TypeKind::IndexedAccess
            | TypeKind::Inferred
            | TypeKind::Intrinsic
            | TypeKind::Literal
            | TypeKind::Mapped
            | TypeKind::Optional
            | TypeKind::Predicate
            | TypeKind::Reference
            | TypeKind::Reflection
            | TypeKind::Rest
            | TypeKind::TemplateLiteral
            | TypeKind::Tuple
            | TypeKind::NamedTupleMember => NEVER_PARENTHESIZE,
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type expression
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Array(ArrayType),
    Conditional(ConditionalType),
    IndexedAccess(IndexedAccessType),
    Inferred(InferredType),
    Intersection(IntersectionType),
    Intrinsic(IntrinsicType),
    Literal(LiteralType),
    Mapped(MappedType),
    Optional(OptionalType),
    Predicate(PredicateType),
    Query(QueryType),
    Reference(ReferenceType),
    Reflection(ReflectionType),
    Rest(RestType),
    TemplateLiteral(TemplateLiteralType),
    Tuple(TupleType),
    NamedTupleMember(NamedTupleMember),
    TypeOperator(TypeOperatorType),
    Union(UnionType),
    Unknown(UnknownType),
}

impl Type {
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Array(_) => TypeKind::Array,
            Type::Conditional(_) => TypeKind::Conditional,
            Type::IndexedAccess(_) => TypeKind::IndexedAccess,
            Type::Inferred(_) => TypeKind::Inferred,
            Type::Intersection(_) => TypeKind::Intersection,
            Type::Intrinsic(_) => TypeKind::Intrinsic,
            Type::Literal(_) => TypeKind::Literal,
            Type::Mapped(_) => TypeKind::Mapped,
            Type::Optional(_) => TypeKind::Optional,
            Type::Predicate(_) => TypeKind::Predicate,
            Type::Query(_) => TypeKind::Query,
            Type::Reference(_) => TypeKind::Reference,
            Type::Reflection(_) => TypeKind::Reflection,
            Type::Rest(_) => TypeKind::Rest,
            Type::TemplateLiteral(_) => TypeKind::TemplateLiteral,
            Type::Tuple(_) => TypeKind::Tuple,
            Type::NamedTupleMember(_) => TypeKind::NamedTupleMember,
            Type::TypeOperator(_) => TypeKind::TypeOperator,
            Type::Union(_) => TypeKind::Union,
            Type::Unknown(_) => TypeKind::Unknown,
        }
    }

    pub fn binding_power(&self) -> i32 {
        self.kind().binding_power()
    }

    pub fn array(element_type: Type) -> Self {
        Type::Array(ArrayType {
            element_type: Box::new(element_type),
        })
    }

    pub fn conditional(check: Type, extends: Type, true_type: Type, false_type: Type) -> Self {
        Type::Conditional(ConditionalType {
            check_type: Box::new(check),
            extends_type: Box::new(extends),
            true_type: Box::new(true_type),
            false_type: Box::new(false_type),
        })
    }

    pub fn indexed_access(object_type: Type, index_type: Type) -> Self {
        Type::IndexedAccess(IndexedAccessType {
            object_type: Box::new(object_type),
            index_type: Box::new(index_type),
        })
    }

    pub fn inferred(name: impl Into<String>) -> Self {
        Type::Inferred(InferredType { name: name.into() })
    }

    pub fn intersection(types: Vec<Type>) -> Self {
        Type::Intersection(IntersectionType { types })
    }

    pub fn intrinsic(name: impl Into<String>) -> Self {
        Type::Intrinsic(IntrinsicType { name: name.into() })
    }

    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Type::Literal(LiteralType {
            value: value.into(),
        })
    }

    pub fn optional(element_type: Type) -> Self {
        Type::Optional(OptionalType {
            element_type: Box::new(element_type),
        })
    }

    pub fn query(reference: ReferenceType) -> Self {
        Type::Query(QueryType {
            query_type: reference,
        })
    }

    pub fn reflection(declaration: ReflectionId) -> Self {
        Type::Reflection(ReflectionType { declaration })
    }

    pub fn rest(element_type: Type) -> Self {
        Type::Rest(RestType {
            element_type: Box::new(element_type),
        })
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(TupleType { elements })
    }

    pub fn named_tuple_member(name: impl Into<String>, is_optional: bool, element: Type) -> Self {
        Type::NamedTupleMember(NamedTupleMember {
            name: name.into(),
            is_optional,
            element: Box::new(element),
        })
    }

    pub fn type_operator(operator: TypeOperator, target: Type) -> Self {
        Type::TypeOperator(TypeOperatorType {
            target: Box::new(target),
            operator,
        })
    }

    /// Build a union, collapsing a `true | false` pair into `boolean`
    pub fn union(types: Vec<Type>) -> Self {
        Type::Union(UnionType::new(types))
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Type::Unknown(UnknownType { name: name.into() })
    }

    fn is_literal_bool(&self, value: bool) -> bool {
        match self {
            Type::Literal(lit) if value => lit.value.is_true(),
            Type::Literal(lit) => lit.value.is_false(),
            _ => false,
        }
    }
}

impl From<ReferenceType> for Type {
    fn from(reference: ReferenceType) -> Self {
        Type::Reference(reference)
    }
}

/// `T[]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element_type: Box<Type>,
}

/// `Check extends Extends ? True : False`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalType {
    pub check_type: Box<Type>,
    pub extends_type: Box<Type>,
    pub true_type: Box<Type>,
    pub false_type: Box<Type>,
}

/// `Object[Index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedAccessType {
    pub object_type: Box<Type>,
    pub index_type: Box<Type>,
}

/// The `U` in `Promise<infer U>`
#[derive(Debug, Clone, PartialEq)]
pub struct InferredType {
    pub name: String,
}

/// `A & B`
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionType {
    pub types: Vec<Type>,
}

/// Built-in types such as `string` or `boolean`
#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicType {
    pub name: String,
}

/// `"A"`, `1`, `true`, `null` or `10n`
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralType {
    pub value: LiteralValue,
}

/// `+` or `-` in front of a mapped type's `readonly` or `?`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappedModifier {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Remove,
}

/// `{ -readonly [K in keyof U & string as `a${K}`]?: Foo }`
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    pub parameter: String,
    pub parameter_type: Box<Type>,
    pub template_type: Box<Type>,
    pub readonly_modifier: Option<MappedModifier>,
    pub optional_modifier: Option<MappedModifier>,
    pub name_type: Option<Box<Type>>,
}

impl MappedType {
    pub fn new(parameter: impl Into<String>, parameter_type: Type, template_type: Type) -> Self {
        Self {
            parameter: parameter.into(),
            parameter_type: Box::new(parameter_type),
            template_type: Box::new(template_type),
            readonly_modifier: None,
            optional_modifier: None,
            name_type: None,
        }
    }

    pub fn with_readonly(mut self, modifier: MappedModifier) -> Self {
        self.readonly_modifier = Some(modifier);
        self
    }

    pub fn with_optional(mut self, modifier: MappedModifier) -> Self {
        self.optional_modifier = Some(modifier);
        self
    }

    pub fn with_name_type(mut self, name_type: Type) -> Self {
        self.name_type = Some(Box::new(name_type));
        self
    }
}

/// An optional tuple element: the `2?` in `[1, 2?]`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalType {
    pub element_type: Box<Type>,
}

/// `x is string`, `asserts x is string` or `asserts x`
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateType {
    pub name: String,
    pub asserts: bool,
    pub target_type: Option<Box<Type>>,
}

/// `typeof x`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryType {
    pub query_type: ReferenceType,
}

/// A type with its own anonymous declaration, such as `{ a: string }`
///
/// The declaration lives in the project registry; this variant only names it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionType {
    pub declaration: ReflectionId,
}

/// A rest tuple element: the `...2[]` in `[1, ...2[]]`
#[derive(Debug, Clone, PartialEq)]
pub struct RestType {
    pub element_type: Box<Type>,
}

/// `` `${'a' | 'b'}-suffix` ``
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteralType {
    pub head: String,
    pub tail: Vec<(Type, String)>,
}

/// `[string, boolean]`
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub elements: Vec<Type>,
}

/// `name?: string` inside a tuple
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTupleMember {
    pub name: String,
    pub is_optional: bool,
    pub element: Box<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOperator {
    KeyOf,
    Unique,
    Readonly,
}

impl TypeOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeOperator::KeyOf => "keyof",
            TypeOperator::Unique => "unique",
            TypeOperator::Readonly => "readonly",
        }
    }
}

/// `keyof T`, `unique symbol`, `readonly string[]`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeOperatorType {
    pub target: Box<Type>,
    pub operator: TypeOperator,
}

/// `A | B`
///
/// Members are only reachable through [`UnionType::new`], which collapses a
/// literal `true` and literal `false` into a single `boolean` intrinsic.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    types: Vec<Type>,
}

impl UnionType {
    pub fn new(types: Vec<Type>) -> Self {
        let mut union = Self { types };
        union.normalize();
        union
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    fn normalize(&mut self) {
        let true_index = self.types.iter().position(|t| t.is_literal_bool(true));
        let false_index = self.types.iter().position(|t| t.is_literal_bool(false));

        if let (Some(t), Some(f)) = (true_index, false_index) {
            // `boolean` takes the slot of whichever literal came first
            self.types.remove(t.max(f));
            self.types[t.min(f)] = Type::intrinsic("boolean");
        }
    }
}

/// A type the producer could not convert, kept as its source text
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownType {
    pub name: String,
}
