//! Shared projects for integration tests
//!
//! `sample_project` builds a small library by hand through the public
//! mutation surface; `load_fixture` reads a stored JSON tree.

#![allow(dead_code)]

use std::path::PathBuf;

use docgraph_core::package_path::ExternalName;
use docgraph_core::types::{
    MappedModifier, MappedType, PredicateType, TemplateLiteralType, TypeOperator,
};
use docgraph_core::{
    PseudoBigInt, Project, ReferenceType, ReflectionCategory, ReflectionId, ReflectionKind, Type,
};

/// Load `tests/fixtures/<name>.json`
pub fn load_fixture(name: &str) -> serde_json::Value {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(format!("{}.json", name));

    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));

    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}

/// Ids of interesting reflections in [`sample_project`]
pub struct Sample {
    pub project: Project,
    pub container: ReflectionId,
    pub get_signature: ReflectionId,
    pub everything: ReflectionId,
    pub answer: ReflectionId,
}

pub fn t(name: &str) -> Type {
    Type::intrinsic(name)
}

/// One type of every kind, in discriminator order
pub fn every_type(project: &mut Project, answer: ReflectionId) -> Vec<Type> {
    let literal = project.add_type_literal(None).unwrap();
    project
        .add_declaration(Some(literal), "x", ReflectionKind::Property, None)
        .unwrap();

    let element = ReferenceType::broken("T");
    vec![
        Type::array(t("string")),
        Type::conditional(
            Type::from(element.clone()),
            t("string"),
            Type::literal("yes"),
            Type::literal("no"),
        ),
        Type::indexed_access(Type::from(element.clone()), Type::literal("key")),
        Type::inferred("U"),
        Type::intersection(vec![
            Type::from(ReferenceType::broken("A")),
            Type::from(ReferenceType::broken("B")),
        ]),
        t("number"),
        Type::literal(PseudoBigInt::from(-42i64)),
        Type::Mapped(
            MappedType::new(
                "K",
                Type::type_operator(TypeOperator::KeyOf, Type::from(element.clone())),
                t("boolean"),
            )
                .with_readonly(MappedModifier::Remove)
                .with_optional(MappedModifier::Add)
                .with_name_type(Type::TemplateLiteral(TemplateLiteralType {
                    head: "get".to_string(),
                    tail: vec![(Type::inferred("K"), String::new())],
                })),
        ),
        Type::optional(t("number")),
        Type::Predicate(PredicateType {
            name: "value".to_string(),
            asserts: true,
            target_type: Some(Box::new(t("string"))),
        }),
        Type::query(ReferenceType::resolved("answer", answer)),
        Type::from(
            ReferenceType::broken("Buffer")
                .with_type_arguments(vec![t("number")])
                .with_external(ExternalName::new("Buffer", "@types/node")),
        ),
        Type::reflection(literal),
        Type::rest(Type::array(t("boolean"))),
        Type::TemplateLiteral(TemplateLiteralType {
            head: "id-".to_string(),
            tail: vec![(t("number"), "-end".to_string())],
        }),
        Type::tuple(vec![]),
        Type::named_tuple_member("name", true, t("string")),
        Type::type_operator(TypeOperator::Unique, t("symbol")),
        Type::union(vec![Type::literal(true), Type::literal(1.5), Type::literal(false)]),
        Type::unknown("import(\"fs\").Stats"),
    ]
}

pub fn sample_project() -> Sample {
    let mut project = Project::new("sample");

    let answer = project
        .add_declaration(None, "answer", ReflectionKind::Variable, None)
        .unwrap();
    {
        let reflection = project.get_mut(answer).unwrap();
        reflection.flags.is_const = true;
        let decl = reflection.as_declaration_mut().unwrap();
        decl.ty = Some(Type::literal(42.0));
        decl.default_value = Some("42".to_string());
    }

    let base = project
        .add_declaration(None, "Base", ReflectionKind::Interface, None)
        .unwrap();
    let base_get = project
        .add_declaration(Some(base), "get", ReflectionKind::Method, None)
        .unwrap();
    let base_get_sig = project
        .add_signature(base_get, "get", ReflectionKind::CallSignature)
        .unwrap();
    project.add_parameter(base_get_sig, "key", Some(t("string"))).unwrap();
    project.get_mut(base_get_sig).unwrap().as_signature_mut().unwrap().ty = Some(t("unknown"));

    let container = project
        .add_declaration(None, "Container", ReflectionKind::Class, None)
        .unwrap();
    let tp = project
        .add_type_parameter(
            container,
            "T",
            Some(t("object")),
            Some(Type::from(ReferenceType::broken("Record"))),
        )
        .unwrap();
    let items = project
        .add_declaration(Some(container), "items", ReflectionKind::Property, None)
        .unwrap();
    {
        let reflection = project.get_mut(items).unwrap();
        reflection.flags.is_readonly = true;
        reflection.flags.is_private = true;
        reflection.as_declaration_mut().unwrap().ty =
            Some(Type::array(Type::from(ReferenceType::resolved("T", tp))));
    }

    let get = project
        .add_declaration(Some(container), "get", ReflectionKind::Method, None)
        .unwrap();
    let get_signature = project
        .add_signature(get, "get", ReflectionKind::CallSignature)
        .unwrap();
    let k = project
        .add_type_parameter(
            get_signature,
            "K",
            Some(Type::type_operator(
                TypeOperator::KeyOf,
                Type::from(ReferenceType::resolved("T", tp)),
            )),
            None,
        )
        .unwrap();
    let key = project
        .add_parameter(get_signature, "key", Some(Type::from(ReferenceType::resolved("K", k))))
        .unwrap();
    project.get_mut(key).unwrap().as_parameter_mut().unwrap().default_value =
        Some("\"id\"".to_string());
    {
        let sig = project.get_mut(get_signature).unwrap().as_signature_mut().unwrap();
        sig.ty = Some(Type::indexed_access(
            Type::from(ReferenceType::resolved("T", tp)),
            Type::from(ReferenceType::resolved("K", k)),
        ));
        sig.implementation_of = Some(ReferenceType::resolved("Base.get", base_get_sig));
    }
    project
        .get_mut(get)
        .unwrap()
        .as_declaration_mut()
        .unwrap()
        .implementation_of = Some(ReferenceType::resolved("Base.get", base_get));

    let size = project
        .add_declaration(Some(container), "size", ReflectionKind::Accessor, None)
        .unwrap();
    let getter = project
        .add_signature(size, "size", ReflectionKind::GetSignature)
        .unwrap();
    project.get_mut(getter).unwrap().as_signature_mut().unwrap().ty = Some(t("number"));
    let setter = project
        .add_signature(size, "size", ReflectionKind::SetSignature)
        .unwrap();
    project.add_parameter(setter, "value", Some(t("number"))).unwrap();

    let ctor = project
        .add_signature(container, "new Container", ReflectionKind::ConstructorSignature)
        .unwrap();
    project.get_mut(ctor).unwrap().as_signature_mut().unwrap().ty =
        Some(Type::from(ReferenceType::resolved("Container", container)));

    let make = project
        .add_declaration(None, "make", ReflectionKind::Function, None)
        .unwrap();
    let make_sig = project
        .add_signature(make, "make", ReflectionKind::CallSignature)
        .unwrap();
    let callback = project.add_type_literal(None).unwrap();
    let call = project
        .add_signature(callback, "__call", ReflectionKind::CallSignature)
        .unwrap();
    project.get_mut(call).unwrap().as_signature_mut().unwrap().ty = Some(t("void"));
    project.get_mut(make_sig).unwrap().as_signature_mut().unwrap().ty =
        Some(Type::reflection(callback));

    let everything = project
        .add_declaration(None, "Everything", ReflectionKind::TypeAlias, None)
        .unwrap();
    let types = every_type(&mut project, answer);
    project
        .get_mut(everything)
        .unwrap()
        .as_declaration_mut()
        .unwrap()
        .ty = Some(Type::tuple(types));

    let mut classes = ReflectionCategory::new("Classes");
    classes.children.push(container);
    project.categories.push(classes);
    let mut members = ReflectionCategory::new("Accessors");
    members.children.push(size);
    project
        .get_mut(container)
        .unwrap()
        .as_declaration_mut()
        .unwrap()
        .categories
        .push(members);
    project
        .get_mut(container)
        .unwrap()
        .as_declaration_mut()
        .unwrap()
        .has_own_document = true;

    Sample {
        project,
        container,
        get_signature,
        everything,
        answer,
    }
}
