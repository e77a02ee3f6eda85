//! References from type expressions to reflections
//!
//! A [`ReferenceType`] never owns the reflection it names. Its target is
//! either a producer-side symbol handle, only meaningful while the extractor
//! runs, or a durable [`ReflectionId`]. The first successful resolution of a
//! symbol target replaces it with the resolved id, so later lookups (and the
//! serialized form) no longer depend on the producer.

use std::cell::Cell;
use std::fmt;

use tracing::trace;

use crate::package_path::ExternalName;
use crate::project::Project;
use crate::reflection::{Reflection, ReflectionId};
use crate::types::Type;

/// Opaque handle to a symbol in the producer's semantic model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u64);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol#{}", self.0)
    }
}

/// What a reference currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    Symbol(SymbolId),
    Reflection(ReflectionId),
}

/// The narrow slice of the producer's semantic analyzer references need
pub trait SymbolResolver {
    /// The symbol's own name, used when the caller supplies none
    fn symbol_name(&self, symbol: SymbolId) -> String;

    /// File name of the symbol's first declaration
    fn declaration_file(&self, symbol: SymbolId) -> Option<String>;

    /// The analyzer's fully-qualified name for the symbol
    fn fully_qualified_name(&self, symbol: SymbolId) -> String;
}

/// A type that names another reflection, like `MyClass<T>`
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    /// Name to show when the target cannot be resolved
    pub name: String,
    pub type_arguments: Vec<Type>,
    target: Cell<ReferenceTarget>,
    external: Option<ExternalName>,
}

impl ReferenceType {
    fn with_target(name: impl Into<String>, target: ReferenceTarget) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
            target: Cell::new(target),
            external: None,
        }
    }

    /// A reference to an already-known reflection id
    pub fn resolved(name: impl Into<String>, id: ReflectionId) -> Self {
        Self::with_target(name, ReferenceTarget::Reflection(id))
    }

    /// A reference that never resolves, such as a type parameter's name
    pub fn broken(name: impl Into<String>) -> Self {
        Self::with_target(name, ReferenceTarget::Reflection(ReflectionId::BROKEN))
    }

    /// A reference to a producer symbol, resolved lazily against a project
    ///
    /// Symbols declared under a dependency boundary also record their package
    /// and qualified name.
    pub fn from_symbol<R>(symbol: SymbolId, name: Option<&str>, resolver: &R) -> Self
    where
        R: SymbolResolver + ?Sized,
    {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| resolver.symbol_name(symbol));
        let mut reference = Self::with_target(name, ReferenceTarget::Symbol(symbol));

        if let Some(file) = resolver.declaration_file(symbol) {
            reference.external =
                ExternalName::from_declaration(&file, &resolver.fully_qualified_name(symbol));
        }
        reference
    }

    pub fn with_type_arguments(mut self, type_arguments: Vec<Type>) -> Self {
        self.type_arguments = type_arguments;
        self
    }

    pub fn with_external(mut self, external: ExternalName) -> Self {
        self.external = Some(external);
        self
    }

    pub fn target(&self) -> ReferenceTarget {
        self.target.get()
    }

    /// The producer symbol, until resolution has replaced it with an id
    pub fn symbol(&self) -> Option<SymbolId> {
        match self.target.get() {
            ReferenceTarget::Symbol(symbol) => Some(symbol),
            ReferenceTarget::Reflection(_) => None,
        }
    }

    pub fn external(&self) -> Option<&ExternalName> {
        self.external.as_ref()
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.external.as_ref().map(|e| e.qualified_name.as_str())
    }

    pub fn package(&self) -> Option<&str> {
        self.external.as_ref().map(|e| e.package.as_str())
    }

    /// Resolve the target against `project`
    ///
    /// Unresolvable targets yield `None`. A symbol target that resolves is
    /// replaced by the reflection's id; that upgrade happens at most once.
    pub fn reflection<'p>(&self, project: &'p Project) -> Option<&'p Reflection> {
        match self.target.get() {
            ReferenceTarget::Reflection(id) => project.get(id),
            ReferenceTarget::Symbol(symbol) => {
                let reflection = project.reflection_from_symbol(symbol)?;
                trace!(%symbol, id = %reflection.id, name = %self.name, "resolved reference");
                self.target.set(ReferenceTarget::Reflection(reflection.id));
                Some(reflection)
            }
        }
    }

    pub fn reflection_id(&self, project: &Project) -> Option<ReflectionId> {
        self.reflection(project).map(|r| r.id)
    }

    /// The resolved reflection's current name, or the stored name
    pub fn display_name<'a>(&'a self, project: &'a Project) -> &'a str {
        self.reflection(project)
            .map_or(self.name.as_str(), |r| r.name.as_str())
    }

    pub(crate) fn fmt_with(&self, f: &mut fmt::Formatter<'_>, project: &Project) -> fmt::Result {
        f.write_str(self.display_name(project))?;
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg.display(project))?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
