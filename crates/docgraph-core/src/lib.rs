//! Type algebra and declaration graph for generated API documentation
//!
//! A [`Project`] owns every [`Reflection`] (declarations, signatures,
//! parameters and type parameters) by id. [`Type`] values describe the types
//! those reflections carry and render to source syntax against the project
//! they belong to. Both round-trip through the JSON model in
//! [`serialization`].

pub mod config;
pub mod error;
pub mod literal;
pub mod package_path;
pub mod project;
pub mod reference;
pub mod reflection;
pub mod serialization;
pub mod types;

pub use config::SerializerConfig;
pub use error::CoreError;
pub use literal::{LiteralValue, PseudoBigInt};
pub use project::Project;
pub use reference::{ReferenceTarget, ReferenceType, SymbolId, SymbolResolver};
pub use reflection::{
    Reflection, ReflectionCategory, ReflectionFlags, ReflectionId, ReflectionKind,
    TraverseProperty,
};
pub use types::{Type, TypeKind, TypeVisitor};
