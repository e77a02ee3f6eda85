//! Visitors over type expressions
//!
//! [`TypeVisitor`] is the full double-dispatch interface: one handler per
//! variant, all required, so adding a variant fails to compile until every
//! visitor handles it. [`TypeCallbacks`] is the partial form used by
//! [`RecursiveVisitor`], which calls the matching callback and then descends
//! into each child type in declaration order.

use super::{
    ArrayType, ConditionalType, IndexedAccessType, InferredType, IntersectionType, IntrinsicType,
    LiteralType, MappedType, NamedTupleMember, OptionalType, PredicateType, QueryType,
    ReflectionType, RestType, TemplateLiteralType, TupleType, Type, TypeOperatorType, UnionType,
    UnknownType,
};
use crate::reference::ReferenceType;

pub trait TypeVisitor {
    type Output;

    fn visit_array(&mut self, ty: &ArrayType) -> Self::Output;
    fn visit_conditional(&mut self, ty: &ConditionalType) -> Self::Output;
    fn visit_indexed_access(&mut self, ty: &IndexedAccessType) -> Self::Output;
    fn visit_inferred(&mut self, ty: &InferredType) -> Self::Output;
    fn visit_intersection(&mut self, ty: &IntersectionType) -> Self::Output;
    fn visit_intrinsic(&mut self, ty: &IntrinsicType) -> Self::Output;
    fn visit_literal(&mut self, ty: &LiteralType) -> Self::Output;
    fn visit_mapped(&mut self, ty: &MappedType) -> Self::Output;
    fn visit_optional(&mut self, ty: &OptionalType) -> Self::Output;
    fn visit_predicate(&mut self, ty: &PredicateType) -> Self::Output;
    fn visit_query(&mut self, ty: &QueryType) -> Self::Output;
    fn visit_reference(&mut self, ty: &ReferenceType) -> Self::Output;
    fn visit_reflection(&mut self, ty: &ReflectionType) -> Self::Output;
    fn visit_rest(&mut self, ty: &RestType) -> Self::Output;
    fn visit_template_literal(&mut self, ty: &TemplateLiteralType) -> Self::Output;
    fn visit_tuple(&mut self, ty: &TupleType) -> Self::Output;
    fn visit_named_tuple_member(&mut self, ty: &NamedTupleMember) -> Self::Output;
    fn visit_type_operator(&mut self, ty: &TypeOperatorType) -> Self::Output;
    fn visit_union(&mut self, ty: &UnionType) -> Self::Output;
    fn visit_unknown(&mut self, ty: &UnknownType) -> Self::Output;
}

impl Type {
    /// Dispatch to the visitor's handler for this variant
    pub fn visit<V: TypeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Type::Array(ty) => visitor.visit_array(ty),
            Type::Conditional(ty) => visitor.visit_conditional(ty),
            Type::IndexedAccess(ty) => visitor.visit_indexed_access(ty),
            Type::Inferred(ty) => visitor.visit_inferred(ty),
            Type::Intersection(ty) => visitor.visit_intersection(ty),
            Type::Intrinsic(ty) => visitor.visit_intrinsic(ty),
            Type::Literal(ty) => visitor.visit_literal(ty),
            Type::Mapped(ty) => visitor.visit_mapped(ty),
            Type::Optional(ty) => visitor.visit_optional(ty),
            Type::Predicate(ty) => visitor.visit_predicate(ty),
            Type::Query(ty) => visitor.visit_query(ty),
            Type::Reference(ty) => visitor.visit_reference(ty),
            Type::Reflection(ty) => visitor.visit_reflection(ty),
            Type::Rest(ty) => visitor.visit_rest(ty),
            Type::TemplateLiteral(ty) => visitor.visit_template_literal(ty),
            Type::Tuple(ty) => visitor.visit_tuple(ty),
            Type::NamedTupleMember(ty) => visitor.visit_named_tuple_member(ty),
            Type::TypeOperator(ty) => visitor.visit_type_operator(ty),
            Type::Union(ty) => visitor.visit_union(ty),
            Type::Unknown(ty) => visitor.visit_unknown(ty),
        }
    }

    /// Walk this type and every nested child type, pre-order
    pub fn walk<C: TypeCallbacks + ?Sized>(&self, callbacks: &mut C) {
        self.visit(&mut make_recursive_visitor(callbacks));
    }
}

/// Per-variant hooks for a [`RecursiveVisitor`]; every hook defaults to a no-op
#[allow(unused_variables)]
pub trait TypeCallbacks {
    fn array(&mut self, ty: &ArrayType) {}
    fn conditional(&mut self, ty: &ConditionalType) {}
    fn indexed_access(&mut self, ty: &IndexedAccessType) {}
    fn inferred(&mut self, ty: &InferredType) {}
    fn intersection(&mut self, ty: &IntersectionType) {}
    fn intrinsic(&mut self, ty: &IntrinsicType) {}
    fn literal(&mut self, ty: &LiteralType) {}
    fn mapped(&mut self, ty: &MappedType) {}
    fn optional(&mut self, ty: &OptionalType) {}
    fn predicate(&mut self, ty: &PredicateType) {}
    fn query(&mut self, ty: &QueryType) {}
    fn reference(&mut self, ty: &ReferenceType) {}
    fn reflection(&mut self, ty: &ReflectionType) {}
    fn rest(&mut self, ty: &RestType) {}
    fn template_literal(&mut self, ty: &TemplateLiteralType) {}
    fn tuple(&mut self, ty: &TupleType) {}
    fn named_tuple_member(&mut self, ty: &NamedTupleMember) {}
    fn type_operator(&mut self, ty: &TypeOperatorType) {}
    fn union(&mut self, ty: &UnionType) {}
    fn unknown(&mut self, ty: &UnknownType) {}
}

/// Deep visitor built from a partial set of callbacks
///
/// Reflection types are not descended into: the embedded declaration is a
/// reflection, not a type, and callers that need its contents traverse the
/// project instead.
pub struct RecursiveVisitor<'c, C: ?Sized> {
    callbacks: &'c mut C,
}

pub fn make_recursive_visitor<C: TypeCallbacks + ?Sized>(
    callbacks: &mut C,
) -> RecursiveVisitor<'_, C> {
    RecursiveVisitor { callbacks }
}

impl<C: TypeCallbacks + ?Sized> RecursiveVisitor<'_, C> {
    fn all(&mut self, types: &[Type]) {
        for ty in types {
            ty.visit(self);
        }
    }
}

impl<C: TypeCallbacks + ?Sized> TypeVisitor for RecursiveVisitor<'_, C> {
    type Output = ();

    fn visit_array(&mut self, ty: &ArrayType) {
        self.callbacks.array(ty);
        ty.element_type.visit(self);
    }

    fn visit_conditional(&mut self, ty: &ConditionalType) {
        self.callbacks.conditional(ty);
        ty.check_type.visit(self);
        ty.extends_type.visit(self);
        ty.true_type.visit(self);
        ty.false_type.visit(self);
    }

    fn visit_indexed_access(&mut self, ty: &IndexedAccessType) {
        self.callbacks.indexed_access(ty);
        ty.index_type.visit(self);
        ty.object_type.visit(self);
    }

    fn visit_inferred(&mut self, ty: &InferredType) {
        self.callbacks.inferred(ty);
    }

    fn visit_intersection(&mut self, ty: &IntersectionType) {
        self.callbacks.intersection(ty);
        self.all(&ty.types);
    }

    fn visit_intrinsic(&mut self, ty: &IntrinsicType) {
        self.callbacks.intrinsic(ty);
    }

    fn visit_literal(&mut self, ty: &LiteralType) {
        self.callbacks.literal(ty);
    }

    fn visit_mapped(&mut self, ty: &MappedType) {
        self.callbacks.mapped(ty);
        if let Some(name_type) = &ty.name_type {
            name_type.visit(self);
        }
        ty.parameter_type.visit(self);
        ty.template_type.visit(self);
    }

    fn visit_optional(&mut self, ty: &OptionalType) {
        self.callbacks.optional(ty);
        ty.element_type.visit(self);
    }

    fn visit_predicate(&mut self, ty: &PredicateType) {
        self.callbacks.predicate(ty);
        if let Some(target) = &ty.target_type {
            target.visit(self);
        }
    }

    fn visit_query(&mut self, ty: &QueryType) {
        self.callbacks.query(ty);
        self.visit_reference(&ty.query_type);
    }

    fn visit_reference(&mut self, ty: &ReferenceType) {
        self.callbacks.reference(ty);
        self.all(&ty.type_arguments);
    }

    fn visit_reflection(&mut self, ty: &ReflectionType) {
        self.callbacks.reflection(ty);
    }

    fn visit_rest(&mut self, ty: &RestType) {
        self.callbacks.rest(ty);
        ty.element_type.visit(self);
    }

    fn visit_template_literal(&mut self, ty: &TemplateLiteralType) {
        self.callbacks.template_literal(ty);
        for (span, _) in &ty.tail {
            span.visit(self);
        }
    }

    fn visit_tuple(&mut self, ty: &TupleType) {
        self.callbacks.tuple(ty);
        self.all(&ty.elements);
    }

    fn visit_named_tuple_member(&mut self, ty: &NamedTupleMember) {
        self.callbacks.named_tuple_member(ty);
        ty.element.visit(self);
    }

    fn visit_type_operator(&mut self, ty: &TypeOperatorType) {
        self.callbacks.type_operator(ty);
        ty.target.visit(self);
    }

    fn visit_union(&mut self, ty: &UnionType) {
        self.callbacks.union(ty);
        self.all(ty.types());
    }

    fn visit_unknown(&mut self, ty: &UnknownType) {
        self.callbacks.unknown(ty);
    }
}
