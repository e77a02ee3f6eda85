//! The per-run registry owning every reflection
//!
//! A [`Project`] is an arena: reflections are stored by id and refer to each
//! other only by id. Ids are allocated in strictly increasing order starting
//! at 1; id 0 is the project itself.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::CoreError;
use crate::reference::SymbolId;
use crate::reflection::{
    DeclarationReflection, ParameterReflection, Reflection, ReflectionCategory, ReflectionFlags,
    ReflectionId, ReflectionKind, ReflectionVariant, SignatureReflection, TypeParameterReflection,
};
use crate::types::Type;

/// Name given to anonymous type-literal declarations
pub const TYPE_LITERAL_NAME: &str = "__type";

#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    reflections: BTreeMap<ReflectionId, Reflection>,
    symbol_to_id: HashMap<SymbolId, ReflectionId>,
    next_id: i32,
    children: Vec<ReflectionId>,
    pub categories: Vec<ReflectionCategory>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reflections: BTreeMap::new(),
            symbol_to_id: HashMap::new(),
            next_id: 1,
            children: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn get(&self, id: ReflectionId) -> Option<&Reflection> {
        self.reflections.get(&id)
    }

    pub fn get_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.reflections.get_mut(&id)
    }

    pub fn contains(&self, id: ReflectionId) -> bool {
        self.reflections.contains_key(&id)
    }

    /// Top-level declarations, in registration order
    pub fn children(&self) -> &[ReflectionId] {
        &self.children
    }

    /// Every registered reflection, in id order
    pub fn reflections(&self) -> impl Iterator<Item = &Reflection> {
        self.reflections.values()
    }

    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    /// The reflection created for a producer symbol, if any
    pub fn reflection_from_symbol(&self, symbol: SymbolId) -> Option<&Reflection> {
        self.symbol_to_id
            .get(&symbol)
            .and_then(|id| self.reflections.get(id))
    }

    /// Associate a producer symbol with a registered reflection
    pub fn register_symbol(&mut self, symbol: SymbolId, id: ReflectionId) -> Result<(), CoreError> {
        if !self.contains(id) {
            return Err(CoreError::UnknownReflection(id));
        }
        debug!(%symbol, %id, "registered symbol");
        self.symbol_to_id.insert(symbol, id);
        Ok(())
    }

    fn allocate_id(&mut self) -> Result<ReflectionId, CoreError> {
        let id = ReflectionId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(CoreError::IdSpaceExhausted(id))?;
        Ok(id)
    }

    fn insert(
        &mut self,
        name: impl Into<String>,
        kind: ReflectionKind,
        parent: Option<ReflectionId>,
        variant: ReflectionVariant,
    ) -> Result<ReflectionId, CoreError> {
        if !variant.accepts(kind) {
            return Err(CoreError::KindMismatch {
                kind,
                expected: variant.name(),
            });
        }
        let id = self.allocate_id()?;
        let reflection = Reflection {
            id,
            name: name.into(),
            kind,
            parent,
            flags: ReflectionFlags::default(),
            variant,
        };
        debug!(%id, name = %reflection.name, %kind, "registered reflection");
        self.reflections.insert(id, reflection);
        Ok(id)
    }

    fn declaration_mut(
        &mut self,
        id: ReflectionId,
        child: &'static str,
    ) -> Result<&mut DeclarationReflection, CoreError> {
        self.reflections
            .get_mut(&id)
            .ok_or(CoreError::UnknownReflection(id))?
            .as_declaration_mut()
            .ok_or(CoreError::InvalidParent { id, child })
    }

    fn signature_mut(
        &mut self,
        id: ReflectionId,
        child: &'static str,
    ) -> Result<&mut SignatureReflection, CoreError> {
        self.reflections
            .get_mut(&id)
            .ok_or(CoreError::UnknownReflection(id))?
            .as_signature_mut()
            .ok_or(CoreError::InvalidParent { id, child })
    }

    /// Register a declaration under `parent`, or at the top level
    pub fn add_declaration(
        &mut self,
        parent: Option<ReflectionId>,
        name: impl Into<String>,
        kind: ReflectionKind,
        symbol: Option<SymbolId>,
    ) -> Result<ReflectionId, CoreError> {
        if let Some(parent) = parent {
            self.declaration_mut(parent, "declaration")?;
        }
        let id = self.insert(
            name,
            kind,
            parent,
            ReflectionVariant::Declaration(DeclarationReflection::default()),
        )?;
        match parent {
            Some(parent) => self.declaration_mut(parent, "declaration")?.children.push(id),
            None => self.children.push(id),
        }
        if let Some(symbol) = symbol {
            self.register_symbol(symbol, id)?;
        }
        Ok(id)
    }

    /// Register an anonymous type-literal declaration
    ///
    /// The literal has no parent; it is owned by whichever reflection type
    /// names it.
    pub fn add_type_literal(
        &mut self,
        symbol: Option<SymbolId>,
    ) -> Result<ReflectionId, CoreError> {
        let id = self.insert(
            TYPE_LITERAL_NAME,
            ReflectionKind::TypeLiteral,
            None,
            ReflectionVariant::Declaration(DeclarationReflection::default()),
        )?;
        if let Some(symbol) = symbol {
            self.register_symbol(symbol, id)?;
        }
        Ok(id)
    }

    /// Register a signature on the declaration `parent`
    ///
    /// Call and constructor signatures accumulate. An index, get or set
    /// signature replaces (and unregisters) any previous one in that slot.
    pub fn add_signature(
        &mut self,
        parent: ReflectionId,
        name: impl Into<String>,
        kind: ReflectionKind,
    ) -> Result<ReflectionId, CoreError> {
        self.declaration_mut(parent, "signature")?;
        let id = self.insert(
            name,
            kind,
            Some(parent),
            ReflectionVariant::Signature(SignatureReflection::default()),
        )?;
        let decl = self.declaration_mut(parent, "signature")?;
        let replaced = match kind {
            ReflectionKind::IndexSignature => decl.index_signature.replace(id),
            ReflectionKind::GetSignature => decl.get_signature.replace(id),
            ReflectionKind::SetSignature => decl.set_signature.replace(id),
            _ => {
                decl.signatures.push(id);
                None
            }
        };
        if let Some(previous) = replaced {
            self.unregister_tree(previous);
        }
        Ok(id)
    }

    /// Register a parameter on the signature `signature`
    pub fn add_parameter(
        &mut self,
        signature: ReflectionId,
        name: impl Into<String>,
        ty: Option<Type>,
    ) -> Result<ReflectionId, CoreError> {
        self.signature_mut(signature, "parameter")?;
        let id = self.insert(
            name,
            ReflectionKind::Parameter,
            Some(signature),
            ReflectionVariant::Parameter(ParameterReflection {
                ty,
                default_value: None,
            }),
        )?;
        self.signature_mut(signature, "parameter")?.parameters.push(id);
        Ok(id)
    }

    /// Register a type parameter on a declaration or signature
    pub fn add_type_parameter(
        &mut self,
        owner: ReflectionId,
        name: impl Into<String>,
        constraint: Option<Type>,
        default: Option<Type>,
    ) -> Result<ReflectionId, CoreError> {
        let accepts = match self.get(owner) {
            None => return Err(CoreError::UnknownReflection(owner)),
            Some(r) => matches!(
                r.variant,
                ReflectionVariant::Declaration(_) | ReflectionVariant::Signature(_)
            ),
        };
        if !accepts {
            return Err(CoreError::InvalidParent {
                id: owner,
                child: "type parameter",
            });
        }
        let id = self.insert(
            name,
            ReflectionKind::TypeParameter,
            Some(owner),
            ReflectionVariant::TypeParameter(TypeParameterReflection::new(constraint, default)),
        )?;
        if let Some(r) = self.reflections.get_mut(&owner) {
            match &mut r.variant {
                ReflectionVariant::Declaration(decl) => decl.type_parameters.push(id),
                ReflectionVariant::Signature(sig) => sig.type_parameters.push(id),
                _ => {}
            }
        }
        Ok(id)
    }

    /// Unregister `id` and everything it owns
    ///
    /// The reflection is detached from its parent (or the project's top
    /// level) and from every category that lists it.
    pub fn remove_reflection(&mut self, id: ReflectionId) -> Result<Reflection, CoreError> {
        let parent = self
            .get(id)
            .ok_or(CoreError::UnknownReflection(id))?
            .parent;
        match parent.and_then(|p| self.reflections.get_mut(&p)) {
            Some(owner) => owner.detach(id),
            None => self.children.retain(|c| *c != id),
        }
        for category in &mut self.categories {
            category.children.retain(|c| *c != id);
        }
        self.unregister_tree(id)
            .ok_or(CoreError::UnknownReflection(id))
    }

    fn unregister_tree(&mut self, id: ReflectionId) -> Option<Reflection> {
        let reflection = self.reflections.remove(&id)?;
        self.symbol_to_id.retain(|_, target| *target != id);
        debug!(%id, name = %reflection.name, "removed reflection");
        for owned in reflection.owned_ids() {
            self.unregister_tree(owned);
        }
        Some(reflection)
    }

    /// `"<Kind> <name>"`; signatures add type parameter names and the return type
    pub fn describe(&self, id: ReflectionId) -> Option<String> {
        let reflection = self.get(id)?;
        let mut out = format!("{} {}", reflection.kind, reflection.name);
        if let Some(sig) = reflection.as_signature() {
            let names: Vec<&str> = sig
                .type_parameters
                .iter()
                .filter_map(|tp| self.get(*tp))
                .map(|tp| tp.name.as_str())
                .collect();
            if !names.is_empty() {
                out.push('<');
                out.push_str(&names.join(", "));
                out.push('>');
            }
            if let Some(ty) = &sig.ty {
                out.push(':');
                out.push_str(&ty.render(self));
            }
        }
        Some(out)
    }

    pub(crate) fn push_top_level(&mut self, id: ReflectionId) {
        self.children.push(id);
    }

    /// Insert a reflection that already carries an id, as decoding does
    pub(crate) fn insert_decoded(&mut self, reflection: Reflection) -> Result<(), CoreError> {
        let id = reflection.id;
        if id.0 <= ReflectionId::PROJECT.0 {
            return Err(CoreError::ReservedId(id));
        }
        if self.contains(id) {
            return Err(CoreError::DuplicateId(id));
        }
        if !reflection.variant.accepts(reflection.kind) {
            return Err(CoreError::KindMismatch {
                kind: reflection.kind,
                expected: reflection.variant.name(),
            });
        }
        let following = id.0.checked_add(1).ok_or(CoreError::IdSpaceExhausted(id))?;
        self.next_id = self.next_id.max(following);
        self.reflections.insert(id, reflection);
        Ok(())
    }
}
