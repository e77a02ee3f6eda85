//! Encode/decode round trips over hand-built projects

mod fixtures;

use std::ops::ControlFlow;

use docgraph_core::types::UnionType;
use docgraph_core::{
    LiteralValue, Project, PseudoBigInt, ReflectionId, SerializerConfig, TraverseProperty, Type,
};
use fixtures::{every_type, sample_project, t};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_project_round_trips_field_for_field() {
    let sample = sample_project();
    let config = SerializerConfig::default();

    let encoded = sample.project.to_json_value(&config).unwrap();
    let decoded = Project::from_json_value(encoded.clone()).unwrap();

    assert_eq!(decoded.to_json_value(&config).unwrap(), encoded);
    assert_eq!(decoded.len(), sample.project.len());
    assert_eq!(decoded.children(), sample.project.children());
    assert_eq!(decoded.categories, sample.project.categories);
    for reflection in sample.project.reflections() {
        assert_eq!(decoded.get(reflection.id), Some(reflection));
    }
}

#[test]
fn test_round_trip_renders_identically() {
    let sample = sample_project();
    let encoded = sample
        .project
        .to_json_string(&SerializerConfig::default())
        .unwrap();
    let decoded = Project::from_json_str(&encoded).unwrap();

    for reflection in sample.project.reflections() {
        let before = reflection.ty().map(|ty| ty.render(&sample.project));
        let after = decoded
            .get(reflection.id)
            .and_then(|r| r.ty())
            .map(|ty| ty.render(&decoded));
        assert_eq!(before, after, "rendering of {}", reflection.name);
        assert_eq!(
            sample.project.describe(reflection.id),
            decoded.describe(reflection.id)
        );
    }
}

#[test]
fn test_every_type_kind_renders() {
    let sample = sample_project();
    let Some(Type::Tuple(tuple)) = sample.project.get(sample.everything).unwrap().ty() else {
        panic!("expected a tuple");
    };
    let lines: Vec<String> = tuple
        .elements
        .iter()
        .map(|ty| format!("{}: {}", ty.kind(), ty.render(&sample.project)))
        .collect();

    assert_snapshot!(lines.join("\n"), @r#"
    array: string[]
    conditional: T extends string ? "yes" : "no"
    indexedAccess: T["key"]
    inferred: infer U
    intersection: A & B
    intrinsic: number
    literal: -42n
    mapped: { -readonly [K in keyof T as `get${infer K}`]?: boolean }
    optional: number?
    predicate: asserts value is string
    query: typeof answer
    reference: Buffer<number>
    reflection: Object
    rest: ...boolean[]
    template-literal: `id-${number}-end`
    tuple: []
    named-tuple-member: name?: string
    typeOperator: unique symbol
    union: boolean | 1.5
    unknown: import("fs").Stats
    "#);
}

#[test]
fn test_each_type_round_trips_alone() {
    let mut source = Project::new("source");
    let answer = source
        .add_declaration(None, "answer", docgraph_core::ReflectionKind::Variable, None)
        .unwrap();

    for ty in every_type(&mut source, answer) {
        let object = ty.to_object(&source).unwrap();
        let mut target = Project::new("target");
        let decoded = Type::from_object(object, &mut target).unwrap();
        assert_eq!(decoded, ty);
    }
}

#[test]
fn test_signature_traversal_short_circuits() {
    let sample = sample_project();
    let mut project = sample.project;
    let sig = sample.get_signature;
    project.add_type_parameter(sig, "V", None, None).unwrap();
    for name in ["a", "b"] {
        project.add_parameter(sig, name, Some(t("string"))).unwrap();
    }

    // K, V then key, a, b
    let mut calls = Vec::new();
    let flow = project.traverse(sig, |child, property| {
        calls.push(property);
        if child.name == "V" {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(flow, ControlFlow::Break(()));
    assert_eq!(
        calls,
        vec![TraverseProperty::TypeParameter, TraverseProperty::TypeParameter]
    );
}

#[test]
fn test_renamed_reflection_renders_new_name() {
    let sample = sample_project();
    let mut project = sample.project;
    let query = Type::query(docgraph_core::ReferenceType::resolved("answer", sample.answer));

    project.get_mut(sample.answer).unwrap().name = "theAnswer".to_string();
    assert_eq!(query.render(&project), "typeof theAnswer");

    let container = project.get(sample.container).unwrap();
    assert!(container.as_declaration().unwrap().has_own_document);
    let category = &project.categories[0];
    assert!(category.all_children_have_own_document(&project));
}

fn leaf() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(t("string")),
        Just(t("number")),
        "[a-z]{1,6}".prop_map(|s: String| Type::literal(s)),
        any::<i32>().prop_map(|n| Type::literal(f64::from(n))),
    ]
}

proptest! {
    #[test]
    fn prop_bigint_sign_round_trips(value in any::<i128>()) {
        let project = Project::new("prop");
        let ty = Type::literal(PseudoBigInt::from(value));
        let json = serde_json::to_value(ty.to_object(&project).unwrap()).unwrap();
        prop_assert_eq!(&json["value"]["negative"], &serde_json::json!(value < 0));
        prop_assert_eq!(
            &json["value"]["value"],
            &serde_json::json!(value.unsigned_abs().to_string())
        );

        let object = serde_json::from_value(json).unwrap();
        let decoded = Type::from_object(object, &mut Project::new("prop")).unwrap();
        prop_assert_eq!(decoded, ty);
    }

    #[test]
    fn prop_union_normalization_is_idempotent(
        others in prop::collection::vec(leaf(), 0..6),
        true_at in prop::option::of(0usize..7),
        false_at in prop::option::of(0usize..7),
    ) {
        let mut members = others.clone();
        if let Some(i) = true_at {
            members.insert(i.min(members.len()), Type::literal(true));
        }
        if let Some(i) = false_at {
            members.insert(i.min(members.len()), Type::literal(false));
        }

        let once = UnionType::new(members);
        let twice = UnionType::new(once.types().to_vec());
        prop_assert_eq!(&once, &twice);

        if true_at.is_some() && false_at.is_some() {
            let bools = once
                .types()
                .iter()
                .filter(|ty| {
                    matches!(ty, Type::Literal(l) if matches!(l.value, LiteralValue::Bool(_)))
                })
                .count();
            prop_assert_eq!(bools, 0);
            prop_assert!(once.types().contains(&t("boolean")));
            prop_assert_eq!(once.types().len(), others.len() + 1);
        }
    }

    #[test]
    fn prop_boolean_pair_matches_boolean_intrinsic(others in prop::collection::vec(leaf(), 0..6)) {
        let mut with_literals = vec![Type::literal(true), Type::literal(false)];
        with_literals.extend(others.iter().cloned());
        let mut with_intrinsic = vec![t("boolean")];
        with_intrinsic.extend(others);

        prop_assert_eq!(Type::union(with_literals), Type::union(with_intrinsic));
    }
}

#[test]
fn test_ids_stay_unique_after_decode_and_growth() {
    let sample = sample_project();
    let encoded = sample.project.to_json_value(&SerializerConfig::default()).unwrap();
    let mut decoded = Project::from_json_value(encoded).unwrap();

    let highest = decoded.reflections().map(|r| r.id).max().unwrap();
    let fresh = decoded
        .add_declaration(None, "later", docgraph_core::ReflectionKind::Variable, None)
        .unwrap();
    assert!(fresh > highest);
    assert_ne!(fresh, ReflectionId::BROKEN);
}
