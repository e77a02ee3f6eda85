//! Decoding stored JSON trees and encoding them back

mod fixtures;

use docgraph_core::{CoreError, Project, ReferenceType, ReflectionId, SerializerConfig, Type};
use fixtures::load_fixture;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

fn render(project: &Project, id: i32) -> String {
    project
        .get(ReflectionId(id))
        .and_then(|r| r.ty())
        .map(|ty| ty.render(project))
        .unwrap_or_default()
}

#[test]
fn test_fixture_reencodes_identically() {
    let input = load_fixture("library");
    let project = Project::from_json_value(input.clone()).unwrap();
    let output = project.to_json_value(&SerializerConfig::default()).unwrap();
    assert_eq!(output, input);
}

#[test]
fn test_fixture_renders() {
    let project = Project::from_json_value(load_fixture("library")).unwrap();

    assert_snapshot!(render(&project, 4), @"Greeter<T>");
    assert_snapshot!(render(&project, 7), @"string | null");
    assert_snapshot!(render(&project, 8), @"9007199254740993n");
    assert_snapshot!(render(&project, 9), @"Readable");
    assert_snapshot!(
        project.describe(ReflectionId(7)).unwrap(),
        @"CallSignature greet:string | null"
    );
}

#[test]
fn test_fixture_structure() {
    let project = Project::from_json_value(load_fixture("library")).unwrap();

    assert_eq!(project.name, "library");
    assert_eq!(project.len(), 9);
    assert_eq!(
        project.children(),
        &[ReflectionId(1), ReflectionId(8), ReflectionId(9)]
    );

    let greet = project.get(ReflectionId(6)).unwrap();
    assert!(greet.flags.is_public);
    assert_eq!(greet.parent, Some(ReflectionId(1)));

    let sig = project.get(ReflectionId(7)).unwrap().as_signature().unwrap();
    let inherited = sig.inherited_from.as_ref().unwrap();
    assert!(inherited.reflection(&project).is_none());
    assert_eq!(inherited.name, "Base.greet");

    let Some(Type::Reference(stream)) = project.get(ReflectionId(9)).unwrap().ty() else {
        panic!("expected a reference type");
    };
    assert_eq!(stream.package(), Some("@types/node"));
    assert_eq!(stream.qualified_name(), Some("Readable"));
}

#[test]
fn test_unknown_category_children_are_omitted() {
    let mut input = load_fixture("library");
    input["categories"][0]["children"] = serde_json::json!([1, 99]);

    let project = Project::from_json_value(input).unwrap();
    assert_eq!(project.categories[0].children, vec![ReflectionId(1)]);
}

#[test]
fn test_missing_discriminator_fails_loudly() {
    let mut input = load_fixture("library");
    input["children"][1]["type"]
        .as_object_mut()
        .unwrap()
        .remove("type");

    let err = Project::from_json_value(input).unwrap_err();
    assert!(matches!(err, CoreError::Wire(_)));
}

#[test]
fn test_unknown_discriminator_fails_loudly() {
    let mut input = load_fixture("library");
    input["children"][2]["type"]["type"] = serde_json::json!("alias");
    assert!(matches!(
        Project::from_json_value(input),
        Err(CoreError::Wire(_))
    ));
}

#[test]
fn test_kind_strings_can_be_disabled() {
    let project = Project::from_json_value(load_fixture("library")).unwrap();
    let config = SerializerConfig {
        pretty: false,
        kind_strings: false,
    };
    let text = project.to_json_string(&config).unwrap();
    assert!(!text.contains("kindString"));
    assert!(!text.contains('\n'));

    let reparsed = Project::from_json_str(&text).unwrap();
    assert_eq!(reparsed.len(), project.len());
}

#[test]
fn test_broken_reference_renders_and_encodes_without_id() {
    let project = Project::new("empty");
    let reference = ReferenceType::resolved("Gone", ReflectionId(12345));
    assert!(reference.reflection(&project).is_none());

    let ty = Type::from(reference);
    assert_eq!(ty.render(&project), "Gone");
    assert_eq!(
        serde_json::to_value(ty.to_object(&project).unwrap()).unwrap(),
        serde_json::json!({ "type": "reference", "name": "Gone" })
    );
}

fn has_empty_array(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Array(items) => items.is_empty() || items.iter().any(has_empty_array),
        serde_json::Value::Object(map) => map.values().any(has_empty_array),
        _ => false,
    }
}

#[test]
fn test_empty_collections_decode_like_omitted_ones() {
    let explicit = serde_json::json!({
        "id": 0, "name": "p", "kind": 0,
        "categories": [],
        "children": [
            { "id": 1, "name": "Box", "kind": 128, "children": [], "typeParameter": [] },
            {
                "id": 2, "name": "make", "kind": 64,
                "signatures": [{
                    "id": 3, "name": "make", "kind": 4096,
                    "typeParameter": [], "parameters": [],
                    "type": { "type": "reference", "name": "X", "typeArguments": [] }
                }]
            },
            { "id": 4, "name": "unit", "kind": 32, "type": { "type": "tuple", "elements": [] } }
        ]
    });
    let omitted = serde_json::json!({
        "id": 0, "name": "p", "kind": 0,
        "children": [
            { "id": 1, "name": "Box", "kind": 128 },
            {
                "id": 2, "name": "make", "kind": 64,
                "signatures": [{
                    "id": 3, "name": "make", "kind": 4096,
                    "type": { "type": "reference", "name": "X" }
                }]
            },
            { "id": 4, "name": "unit", "kind": 32, "type": { "type": "tuple" } }
        ]
    });

    let from_explicit = Project::from_json_value(explicit).unwrap();
    let from_omitted = Project::from_json_value(omitted).unwrap();

    assert_eq!(from_explicit.children(), from_omitted.children());
    assert_eq!(from_explicit.categories, from_omitted.categories);
    assert_eq!(
        from_explicit.reflections().collect::<Vec<_>>(),
        from_omitted.reflections().collect::<Vec<_>>()
    );

    let config = SerializerConfig::default();
    let reencoded = from_explicit.to_json_value(&config).unwrap();
    assert!(!has_empty_array(&reencoded), "{reencoded}");
    assert_eq!(reencoded, from_omitted.to_json_value(&config).unwrap());
    assert_snapshot!(render(&from_explicit, 3), @"X");
    assert_snapshot!(render(&from_explicit, 4), @"[]");
}
