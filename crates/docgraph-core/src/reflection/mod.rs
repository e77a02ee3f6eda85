//! Reflections: identified, named nodes of the declaration graph
//!
//! Every reflection lives in a [`Project`] arena and is addressed by its
//! [`ReflectionId`]. Ownership follows the declaration tree (a declaration
//! owns its children and signatures, a signature owns its parameters), and is
//! expressed as lists of ids. Back-links (`parent`) and cross-links
//! (`overwrites`, `inheritedFrom`, `implementationOf`) are lookups, never
//! ownership.
//!
//! [`Project`]: crate::project::Project

mod category;
mod traverse;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reference::ReferenceType;
use crate::types::Type;

pub use category::ReflectionCategory;
pub use traverse::TraverseProperty;

/// Identifier of a reflection, unique within one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionId(pub i32);

impl ReflectionId {
    /// The project root
    pub const PROJECT: Self = Self(0);

    /// Sentinel for references that never resolve
    pub const BROKEN: Self = Self(-1);

    pub fn is_broken(self) -> bool {
        self == Self::BROKEN
    }
}

impl fmt::Display for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a reflection declares, with the numeric values used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReflectionKind {
    Project = 0x0,
    Module = 0x1,
    Namespace = 0x2,
    Enum = 0x4,
    EnumMember = 0x10,
    Variable = 0x20,
    Function = 0x40,
    Class = 0x80,
    Interface = 0x100,
    Constructor = 0x200,
    Property = 0x400,
    Method = 0x800,
    CallSignature = 0x1000,
    IndexSignature = 0x2000,
    ConstructorSignature = 0x4000,
    Parameter = 0x8000,
    TypeLiteral = 0x10000,
    TypeParameter = 0x20000,
    Accessor = 0x40000,
    GetSignature = 0x80000,
    SetSignature = 0x100000,
    ObjectLiteral = 0x200000,
    TypeAlias = 0x400000,
    Event = 0x800000,
    Reference = 0x1000000,
}

impl ReflectionKind {
    const ALL: [ReflectionKind; 25] = [
        ReflectionKind::Project,
        ReflectionKind::Module,
        ReflectionKind::Namespace,
        ReflectionKind::Enum,
        ReflectionKind::EnumMember,
        ReflectionKind::Variable,
        ReflectionKind::Function,
        ReflectionKind::Class,
        ReflectionKind::Interface,
        ReflectionKind::Constructor,
        ReflectionKind::Property,
        ReflectionKind::Method,
        ReflectionKind::CallSignature,
        ReflectionKind::IndexSignature,
        ReflectionKind::ConstructorSignature,
        ReflectionKind::Parameter,
        ReflectionKind::TypeLiteral,
        ReflectionKind::TypeParameter,
        ReflectionKind::Accessor,
        ReflectionKind::GetSignature,
        ReflectionKind::SetSignature,
        ReflectionKind::ObjectLiteral,
        ReflectionKind::TypeAlias,
        ReflectionKind::Event,
        ReflectionKind::Reference,
    ];

    pub const fn bits(self) -> u32 {
        self as u32
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.bits() == bits)
    }

    pub fn is_signature(self) -> bool {
        matches!(
            self,
            ReflectionKind::CallSignature
                | ReflectionKind::IndexSignature
                | ReflectionKind::ConstructorSignature
                | ReflectionKind::GetSignature
                | ReflectionKind::SetSignature
        )
    }

    /// Kinds a [`DeclarationReflection`] may carry
    pub fn is_declaration(self) -> bool {
        !self.is_signature()
            && !matches!(
                self,
                ReflectionKind::Project | ReflectionKind::Parameter | ReflectionKind::TypeParameter
            )
    }

    /// The identifier-style name, e.g. `CallSignature`
    pub const fn as_str(self) -> &'static str {
        match self {
            ReflectionKind::Project => "Project",
            ReflectionKind::Module => "Module",
            ReflectionKind::Namespace => "Namespace",
            ReflectionKind::Enum => "Enum",
            ReflectionKind::EnumMember => "EnumMember",
            ReflectionKind::Variable => "Variable",
            ReflectionKind::Function => "Function",
            ReflectionKind::Class => "Class",
            ReflectionKind::Interface => "Interface",
            ReflectionKind::Constructor => "Constructor",
            ReflectionKind::Property => "Property",
            ReflectionKind::Method => "Method",
            ReflectionKind::CallSignature => "CallSignature",
            ReflectionKind::IndexSignature => "IndexSignature",
            ReflectionKind::ConstructorSignature => "ConstructorSignature",
            ReflectionKind::Parameter => "Parameter",
            ReflectionKind::TypeLiteral => "TypeLiteral",
            ReflectionKind::TypeParameter => "TypeParameter",
            ReflectionKind::Accessor => "Accessor",
            ReflectionKind::GetSignature => "GetSignature",
            ReflectionKind::SetSignature => "SetSignature",
            ReflectionKind::ObjectLiteral => "ObjectLiteral",
            ReflectionKind::TypeAlias => "TypeAlias",
            ReflectionKind::Event => "Event",
            ReflectionKind::Reference => "Reference",
        }
    }

    /// Human-readable form emitted as `kindString`, e.g. `Call signature`
    pub fn kind_string(self) -> String {
        let mut out = String::new();
        for (i, ch) in self.as_str().chars().enumerate() {
            if ch.is_ascii_uppercase() && i > 0 {
                out.push(' ');
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl TryFrom<u32> for ReflectionKind {
    type Error = CoreError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(CoreError::UnknownKind(bits))
    }
}

impl fmt::Display for ReflectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Modifier flags; only set flags appear on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionFlags {
    #[serde(skip_serializing_if = "is_false")]
    pub is_private: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_protected: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_public: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_external: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_rest: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_const: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_readonly: bool,
}

impl ReflectionFlags {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A node in the declaration graph
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    pub id: ReflectionId,
    pub name: String,
    pub kind: ReflectionKind,
    /// Enclosing reflection; `None` for top-level and anonymous reflections
    pub parent: Option<ReflectionId>,
    pub flags: ReflectionFlags,
    pub variant: ReflectionVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReflectionVariant {
    Declaration(DeclarationReflection),
    Signature(SignatureReflection),
    Parameter(ParameterReflection),
    TypeParameter(TypeParameterReflection),
}

impl ReflectionVariant {
    pub fn name(&self) -> &'static str {
        match self {
            ReflectionVariant::Declaration(_) => "declaration",
            ReflectionVariant::Signature(_) => "signature",
            ReflectionVariant::Parameter(_) => "parameter",
            ReflectionVariant::TypeParameter(_) => "type parameter",
        }
    }

    /// Whether a reflection of this variant may carry `kind`
    pub fn accepts(&self, kind: ReflectionKind) -> bool {
        match self {
            ReflectionVariant::Declaration(_) => kind.is_declaration(),
            ReflectionVariant::Signature(_) => kind.is_signature(),
            ReflectionVariant::Parameter(_) => kind == ReflectionKind::Parameter,
            ReflectionVariant::TypeParameter(_) => kind == ReflectionKind::TypeParameter,
        }
    }
}

impl Reflection {
    pub fn as_declaration(&self) -> Option<&DeclarationReflection> {
        match &self.variant {
            ReflectionVariant::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_declaration_mut(&mut self) -> Option<&mut DeclarationReflection> {
        match &mut self.variant {
            ReflectionVariant::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_signature(&self) -> Option<&SignatureReflection> {
        match &self.variant {
            ReflectionVariant::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn as_signature_mut(&mut self) -> Option<&mut SignatureReflection> {
        match &mut self.variant {
            ReflectionVariant::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterReflection> {
        match &self.variant {
            ReflectionVariant::Parameter(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterReflection> {
        match &mut self.variant {
            ReflectionVariant::Parameter(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterReflection> {
        match &self.variant {
            ReflectionVariant::TypeParameter(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_type_parameter_mut(&mut self) -> Option<&mut TypeParameterReflection> {
        match &mut self.variant {
            ReflectionVariant::TypeParameter(param) => Some(param),
            _ => None,
        }
    }

    /// The main type carried by this reflection, if any
    pub fn ty(&self) -> Option<&Type> {
        match &self.variant {
            ReflectionVariant::Declaration(decl) => decl.ty.as_ref(),
            ReflectionVariant::Signature(sig) => sig.ty.as_ref(),
            ReflectionVariant::Parameter(param) => param.ty.as_ref(),
            ReflectionVariant::TypeParameter(param) => param.ty.as_ref(),
        }
    }

    /// Ids of every reflection this one owns
    pub(crate) fn owned_ids(&self) -> Vec<ReflectionId> {
        let mut ids = Vec::new();
        if let Some(Type::Reflection(literal)) = self.ty() {
            ids.push(literal.declaration);
        }
        match &self.variant {
            ReflectionVariant::Declaration(decl) => {
                ids.extend(&decl.type_parameters);
                ids.extend(&decl.signatures);
                ids.extend(decl.index_signature);
                ids.extend(decl.get_signature);
                ids.extend(decl.set_signature);
                ids.extend(&decl.children);
            }
            ReflectionVariant::Signature(sig) => {
                ids.extend(&sig.type_parameters);
                ids.extend(&sig.parameters);
            }
            ReflectionVariant::Parameter(_) | ReflectionVariant::TypeParameter(_) => {}
        }
        ids
    }

    /// Drop `id` from every ownership list of this reflection
    pub(crate) fn detach(&mut self, id: ReflectionId) {
        match &mut self.variant {
            ReflectionVariant::Declaration(decl) => {
                decl.children.retain(|c| *c != id);
                decl.signatures.retain(|c| *c != id);
                decl.type_parameters.retain(|c| *c != id);
                for slot in [
                    &mut decl.index_signature,
                    &mut decl.get_signature,
                    &mut decl.set_signature,
                ] {
                    if *slot == Some(id) {
                        *slot = None;
                    }
                }
                for category in &mut decl.categories {
                    category.children.retain(|c| *c != id);
                }
            }
            ReflectionVariant::Signature(sig) => {
                sig.parameters.retain(|c| *c != id);
                sig.type_parameters.retain(|c| *c != id);
            }
            ReflectionVariant::Parameter(_) | ReflectionVariant::TypeParameter(_) => {}
        }
    }
}

/// Classes, interfaces, functions, variables, type literals and the like
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationReflection {
    pub children: Vec<ReflectionId>,
    /// Call and constructor signatures
    pub signatures: Vec<ReflectionId>,
    pub index_signature: Option<ReflectionId>,
    pub get_signature: Option<ReflectionId>,
    pub set_signature: Option<ReflectionId>,
    pub type_parameters: Vec<ReflectionId>,
    pub ty: Option<Type>,
    pub default_value: Option<String>,
    pub overwrites: Option<ReferenceType>,
    pub inherited_from: Option<ReferenceType>,
    pub implementation_of: Option<ReferenceType>,
    pub categories: Vec<ReflectionCategory>,
    /// Set by the renderer when this declaration gets its own page
    pub has_own_document: bool,
}

/// A call, construct, index or accessor signature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureReflection {
    pub parameters: Vec<ReflectionId>,
    pub type_parameters: Vec<ReflectionId>,
    /// The return type
    pub ty: Option<Type>,
    /// The member this signature overrides
    pub overwrites: Option<ReferenceType>,
    /// The member this signature was inherited from
    pub inherited_from: Option<ReferenceType>,
    /// The interface member this signature implements
    pub implementation_of: Option<ReferenceType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterReflection {
    pub ty: Option<Type>,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeParameterReflection {
    /// The constraint, `T extends <type>`
    pub ty: Option<Type>,
    pub default: Option<Type>,
}

impl TypeParameterReflection {
    pub fn new(constraint: Option<Type>, default: Option<Type>) -> Self {
        Self {
            ty: constraint,
            default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_bits() {
        for kind in ReflectionKind::ALL {
            assert_eq!(ReflectionKind::try_from(kind.bits()).unwrap(), kind);
        }
        assert!(matches!(
            ReflectionKind::try_from(0x3),
            Err(CoreError::UnknownKind(0x3))
        ));
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ReflectionKind::CallSignature.kind_string(), "Call signature");
        assert_eq!(ReflectionKind::Class.kind_string(), "Class");
        assert_eq!(ReflectionKind::TypeParameter.kind_string(), "Type parameter");
    }

    #[test]
    fn test_variant_kind_restrictions() {
        let sig = ReflectionVariant::Signature(SignatureReflection::default());
        assert!(sig.accepts(ReflectionKind::GetSignature));
        assert!(!sig.accepts(ReflectionKind::Method));

        let decl = ReflectionVariant::Declaration(DeclarationReflection::default());
        assert!(decl.accepts(ReflectionKind::Method));
        assert!(!decl.accepts(ReflectionKind::Parameter));
        assert!(!decl.accepts(ReflectionKind::Project));
    }

    #[test]
    fn test_flags_serialize_only_set_fields() {
        let flags = ReflectionFlags {
            is_optional: true,
            ..Default::default()
        };
        let value = serde_json::to_value(flags).unwrap();
        assert_eq!(value, serde_json::json!({ "isOptional": true }));
        assert!(ReflectionFlags::default().is_empty());
    }
}
