use thiserror::Error;

use crate::reflection::{ReflectionId, ReflectionKind};
use crate::types::TypeKind;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed wire input: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("Unknown reflection kind: {0:#x}")]
    UnknownKind(u32),

    #[error("Kind {kind} is not valid for a {expected} reflection")]
    KindMismatch {
        kind: ReflectionKind,
        expected: &'static str,
    },

    #[error("Duplicate reflection id {0} in serialized project")]
    DuplicateId(ReflectionId),

    #[error("Reflection id {0} is reserved")]
    ReservedId(ReflectionId),

    #[error("No reflection id is left after {0}")]
    IdSpaceExhausted(ReflectionId),

    #[error("Expected a {expected} type, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: TypeKind,
    },

    #[error("Reflection {0} is not registered in this project")]
    UnknownReflection(ReflectionId),

    #[error("Reflection {id} cannot own a {child}")]
    InvalidParent {
        id: ReflectionId,
        child: &'static str,
    },

    #[error("Invalid bigint literal: {0}")]
    InvalidBigInt(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
