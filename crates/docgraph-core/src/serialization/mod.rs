//! The symmetric encode/decode contract
//!
//! [`Serializer`] turns a project into a tree of [`schema`] objects and
//! [`Deserializer`] rebuilds an equivalent project from one. Decoding always
//! targets a fresh [`Project`].

pub mod schema;

mod deserializer;
mod serializer;

pub use deserializer::Deserializer;
pub use schema::{CategoryObject, LiteralObject, ReflectionObject, SomeType};
pub use serializer::Serializer;

use crate::config::SerializerConfig;
use crate::error::CoreError;
use crate::project::Project;
use crate::types::Type;

impl Project {
    pub fn to_object(&self, config: &SerializerConfig) -> Result<ReflectionObject, CoreError> {
        Serializer::new(self, config.clone()).project_to_object()
    }

    pub fn from_object(object: ReflectionObject) -> Result<Project, CoreError> {
        Deserializer::project_from_object(object)
    }

    pub fn to_json_value(&self, config: &SerializerConfig) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(self.to_object(config)?)?)
    }

    /// Encode as JSON text, pretty-printed when the config asks for it
    pub fn to_json_string(&self, config: &SerializerConfig) -> Result<String, CoreError> {
        let object = self.to_object(config)?;
        let text = if config.pretty {
            serde_json::to_string_pretty(&object)?
        } else {
            serde_json::to_string(&object)?
        };
        Ok(text)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Project, CoreError> {
        Self::from_object(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Project, CoreError> {
        Self::from_object(serde_json::from_str(text)?)
    }
}

impl Type {
    /// Encode this type; reflection types embed their declaration from `project`
    pub fn to_object(&self, project: &Project) -> Result<SomeType, CoreError> {
        Serializer::new(project, SerializerConfig::default()).type_to_object(self)
    }

    /// Decode a type, registering any embedded declarations in `project`
    pub fn from_object(object: SomeType, project: &mut Project) -> Result<Type, CoreError> {
        Deserializer::new(project).type_from_object(object)
    }
}
