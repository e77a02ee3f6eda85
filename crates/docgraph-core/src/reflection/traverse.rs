//! One-level and recursive walks over the reflections a reflection owns

use std::ops::ControlFlow;

use crate::project::Project;
use crate::reflection::{Reflection, ReflectionId, ReflectionVariant};
use crate::types::Type;

/// The slot an owned reflection occupies in its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraverseProperty {
    Children,
    Signatures,
    IndexSignature,
    GetSignature,
    SetSignature,
    TypeParameter,
    TypeLiteral,
    Parameters,
}

fn type_literal(ty: Option<&Type>) -> Option<ReflectionId> {
    match ty {
        Some(Type::Reflection(literal)) => Some(literal.declaration),
        _ => None,
    }
}

impl Reflection {
    /// Owned reflection ids in traversal order, tagged with their slot
    pub(crate) fn traversal_order(&self) -> Vec<(ReflectionId, TraverseProperty)> {
        let mut order = Vec::new();
        match &self.variant {
            ReflectionVariant::Declaration(decl) => {
                order.extend(
                    decl.type_parameters
                        .iter()
                        .map(|id| (*id, TraverseProperty::TypeParameter)),
                );
                order.extend(
                    type_literal(decl.ty.as_ref()).map(|id| (id, TraverseProperty::TypeLiteral)),
                );
                order.extend(
                    decl.signatures
                        .iter()
                        .map(|id| (*id, TraverseProperty::Signatures)),
                );
                order.extend(decl.index_signature.map(|id| (id, TraverseProperty::IndexSignature)));
                order.extend(decl.get_signature.map(|id| (id, TraverseProperty::GetSignature)));
                order.extend(decl.set_signature.map(|id| (id, TraverseProperty::SetSignature)));
                order.extend(decl.children.iter().map(|id| (*id, TraverseProperty::Children)));
            }
            ReflectionVariant::Signature(sig) => {
                order.extend(
                    type_literal(sig.ty.as_ref()).map(|id| (id, TraverseProperty::TypeLiteral)),
                );
                order.extend(
                    sig.type_parameters
                        .iter()
                        .map(|id| (*id, TraverseProperty::TypeParameter)),
                );
                order.extend(
                    sig.parameters
                        .iter()
                        .map(|id| (*id, TraverseProperty::Parameters)),
                );
            }
            ReflectionVariant::Parameter(param) => {
                order.extend(
                    type_literal(param.ty.as_ref()).map(|id| (id, TraverseProperty::TypeLiteral)),
                );
            }
            ReflectionVariant::TypeParameter(_) => {}
        }
        order
    }
}

impl Project {
    /// Call `callback` for every reflection directly owned by `id`
    ///
    /// Stops at the first `ControlFlow::Break` and returns it. Owned ids that
    /// are not registered are skipped.
    pub fn traverse<F>(&self, id: ReflectionId, mut callback: F) -> ControlFlow<()>
    where
        F: FnMut(&Reflection, TraverseProperty) -> ControlFlow<()>,
    {
        let Some(owner) = self.get(id) else {
            return ControlFlow::Continue(());
        };
        for (child, property) in owner.traversal_order() {
            if let Some(reflection) = self.get(child) {
                callback(reflection, property)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Depth-first pre-order walk over every descendant of `id`
    ///
    /// A break anywhere ends the whole walk.
    pub fn traverse_descendants<F>(&self, id: ReflectionId, mut callback: F) -> ControlFlow<()>
    where
        F: FnMut(&Reflection, TraverseProperty) -> ControlFlow<()>,
    {
        self.descend(id, &mut callback)
    }

    fn descend<F>(&self, id: ReflectionId, callback: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&Reflection, TraverseProperty) -> ControlFlow<()>,
    {
        let Some(owner) = self.get(id) else {
            return ControlFlow::Continue(());
        };
        for (child, property) in owner.traversal_order() {
            if let Some(reflection) = self.get(child) {
                callback(reflection, property)?;
                self.descend(child, callback)?;
            }
        }
        ControlFlow::Continue(())
    }
}
