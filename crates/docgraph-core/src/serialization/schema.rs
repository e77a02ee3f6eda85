//! Wire representation of types and reflections
//!
//! These structs mirror the JSON tree field-for-field. Empty collections are
//! held as `None` so they are omitted on output, and absent collections
//! decode as `None`.

use serde::{Deserialize, Serialize};

use crate::reflection::{ReflectionFlags, ReflectionId};
use crate::types::{MappedModifier, TypeKind, TypeOperator};

/// A serialized type, tagged by its `type` discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SomeType {
    #[serde(rename = "array", rename_all = "camelCase")]
    Array { element_type: Box<SomeType> },

    #[serde(rename = "conditional", rename_all = "camelCase")]
    Conditional {
        check_type: Box<SomeType>,
        extends_type: Box<SomeType>,
        true_type: Box<SomeType>,
        false_type: Box<SomeType>,
    },

    #[serde(rename = "indexedAccess", rename_all = "camelCase")]
    IndexedAccess {
        index_type: Box<SomeType>,
        object_type: Box<SomeType>,
    },

    #[serde(rename = "inferred")]
    Inferred { name: String },

    #[serde(rename = "intersection")]
    Intersection { types: Vec<SomeType> },

    #[serde(rename = "intrinsic")]
    Intrinsic { name: String },

    #[serde(rename = "literal")]
    Literal { value: LiteralObject },

    #[serde(rename = "mapped", rename_all = "camelCase")]
    Mapped {
        parameter: String,
        parameter_type: Box<SomeType>,
        template_type: Box<SomeType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        readonly_modifier: Option<MappedModifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        optional_modifier: Option<MappedModifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_type: Option<Box<SomeType>>,
    },

    #[serde(rename = "optional", rename_all = "camelCase")]
    Optional { element_type: Box<SomeType> },

    #[serde(rename = "predicate", rename_all = "camelCase")]
    Predicate {
        name: String,
        asserts: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_type: Option<Box<SomeType>>,
    },

    #[serde(rename = "query", rename_all = "camelCase")]
    Query { query_type: Box<SomeType> },

    #[serde(rename = "reference", rename_all = "camelCase")]
    Reference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ReflectionId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_arguments: Option<Vec<SomeType>>,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qualified_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
    },

    #[serde(rename = "reflection")]
    Reflection { declaration: Box<ReflectionObject> },

    #[serde(rename = "rest", rename_all = "camelCase")]
    Rest { element_type: Box<SomeType> },

    #[serde(rename = "template-literal")]
    TemplateLiteral {
        head: String,
        tail: Vec<(SomeType, String)>,
    },

    #[serde(rename = "tuple")]
    Tuple {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elements: Option<Vec<SomeType>>,
    },

    #[serde(rename = "named-tuple-member", rename_all = "camelCase")]
    NamedTupleMember {
        name: String,
        is_optional: bool,
        element: Box<SomeType>,
    },

    #[serde(rename = "typeOperator")]
    TypeOperator {
        target: Box<SomeType>,
        operator: TypeOperator,
    },

    #[serde(rename = "union")]
    Union { types: Vec<SomeType> },

    #[serde(rename = "unknown")]
    Unknown { name: String },
}

impl SomeType {
    pub fn kind(&self) -> TypeKind {
        match self {
            SomeType::Array { .. } => TypeKind::Array,
            SomeType::Conditional { .. } => TypeKind::Conditional,
            SomeType::IndexedAccess { .. } => TypeKind::IndexedAccess,
            SomeType::Inferred { .. } => TypeKind::Inferred,
            SomeType::Intersection { .. } => TypeKind::Intersection,
            SomeType::Intrinsic { .. } => TypeKind::Intrinsic,
            SomeType::Literal { .. } => TypeKind::Literal,
            SomeType::Mapped { .. } => TypeKind::Mapped,
            SomeType::Optional { .. } => TypeKind::Optional,
            SomeType::Predicate { .. } => TypeKind::Predicate,
            SomeType::Query { .. } => TypeKind::Query,
            SomeType::Reference { .. } => TypeKind::Reference,
            SomeType::Reflection { .. } => TypeKind::Reflection,
            SomeType::Rest { .. } => TypeKind::Rest,
            SomeType::TemplateLiteral { .. } => TypeKind::TemplateLiteral,
            SomeType::Tuple { .. } => TypeKind::Tuple,
            SomeType::NamedTupleMember { .. } => TypeKind::NamedTupleMember,
            SomeType::TypeOperator { .. } => TypeKind::TypeOperator,
            SomeType::Union { .. } => TypeKind::Union,
            SomeType::Unknown { .. } => TypeKind::Unknown,
        }
    }
}

/// A literal's `value` field
///
/// Bigints travel as an object of sign and decimal magnitude. Numbers keep
/// their JSON form so integral values stay integral on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralObject {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    BigInt { value: String, negative: bool },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A serialized reflection of any variant, including the project root
///
/// Which fields apply depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionObject {
    pub id: ReflectionId,
    pub name: String,
    pub kind: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_string: Option<String>,
    #[serde(default, skip_serializing_if = "ReflectionFlags::is_empty")]
    pub flags: ReflectionFlags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ReflectionObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<ReflectionObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<Box<ReflectionObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_signature: Option<Box<ReflectionObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_signature: Option<Box<ReflectionObject>>,
    #[serde(
        rename = "typeParameter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub type_parameters: Option<Vec<ReflectionObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ReflectionObject>>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrites: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_of: Option<SomeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryObject>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_own_document: bool,
}

impl ReflectionObject {
    /// An object carrying only the fields every reflection has
    pub fn new(id: ReflectionId, name: impl Into<String>, kind: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            kind_string: None,
            flags: ReflectionFlags::default(),
            children: None,
            signatures: None,
            index_signature: None,
            get_signature: None,
            set_signature: None,
            type_parameters: None,
            parameters: None,
            ty: None,
            default: None,
            default_value: None,
            overwrites: None,
            inherited_from: None,
            implementation_of: None,
            categories: None,
            has_own_document: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryObject {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ReflectionId>>,
}

/// `Some(items)` unless `items` is empty
pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
