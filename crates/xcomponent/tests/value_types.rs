//! Tests for value kinds, parameter types and nested components.

use std::collections::BTreeMap;

use xcomponent::{
    Catalog, Markup, ParamKind, ParamType, Record, Signature, Value, ValueKind, args,
};

struct User {
    username: String,
}

impl Record for User {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "username" => Some(Value::from(self.username.as_str())),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        vec!["username".to_string()]
    }

    fn type_name(&self) -> &str {
        "User"
    }
}

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register("DummyNode", "<p>{a}</p>", "a: int".parse().unwrap())
        .unwrap();
    catalog
        .register(
            "Types",
            "<>{a}-{b}-{c}-{d}-{e}</>",
            "a: bool, b: bool, c: int, d: str, e: node".parse().unwrap(),
        )
        .unwrap();
    catalog
        .register(
            "ComplexType",
            "<>{u.username}</>",
            "u: record<User>".parse().unwrap(),
        )
        .unwrap();
    catalog
        .register(
            "AddOp",
            "<>{a + b}</>",
            "a: int | bool | str, b: int | bool | str".parse().unwrap(),
        )
        .unwrap();
    catalog
        .register(
            "NestedOperation",
            "<AddOp a={aa} b={bb} />",
            "aa: str, bb: str".parse().unwrap(),
        )
        .unwrap();
    catalog
        .register(
            "NestedExpression",
            "<>{<AddOp a={aa} b={bb} />}</>",
            "aa: str, bb: str".parse().unwrap(),
        )
        .unwrap();
    catalog
}

#[test]
fn simple_types() {
    let catalog = catalog();
    let node = catalog.render("DummyNode", args! { "a" => "4" }).unwrap();
    let out = catalog
        .render(
            "Types",
            args! {
                "a" => false,
                "b" => true,
                "c" => 2,
                "d" => "3",
                "e" => Markup::new(node),
            },
        )
        .unwrap();
    assert_eq!(out, "false-true-2-3-<p>4</p>");
}

#[test]
fn record_field_access() {
    let catalog = catalog();
    let user = Value::record(User {
        username: "bob".to_string(),
    });
    assert_eq!(
        catalog.render("ComplexType", args! { "u" => user }).unwrap(),
        "bob"
    );
}

#[test]
fn record_type_name_is_checked() {
    let catalog = catalog();
    let map = Value::from(args! { "username" => "bob" });
    let err = catalog
        .render("ComplexType", args! { "u" => map })
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument 'u' of 'ComplexType' expects record<User>, got record"
    );
}

#[test]
fn nested_component_as_element_and_as_value() {
    let catalog = catalog();
    for name in ["NestedOperation", "NestedExpression"] {
        let out = catalog
            .render(name, args! { "aa" => "1", "bb" => "2" })
            .unwrap();
        assert_eq!(out, "12", "{name}");
    }
}

#[test]
fn ad_hoc_template_with_literal_attribute() {
    let mut catalog = Catalog::new();
    catalog
        .register(
            "H1",
            r#"<h1 class="5xl">{text}</h1>"#,
            "text: str".parse().unwrap(),
        )
        .unwrap();
    assert_eq!(
        catalog.render_source("<H1 text='Hello'/>", args! {}).unwrap(),
        r#"<h1 class="5xl">Hello</h1>"#
    );
    assert_eq!(catalog.template_cache_len(), 1);

    catalog.render_source("<H1 text='Hello'/>", args! {}).unwrap();
    assert_eq!(catalog.template_cache_len(), 1);
    catalog.clear_template_cache();
    assert_eq!(catalog.template_cache_len(), 0);
}

#[test]
fn rendered_attributes_keep_embedded_quotes() {
    let catalog = Catalog::new();
    assert_eq!(
        catalog
            .render_source(r#"<p title='say "hi"' alt={a}/>"#, args! { "a" => "x'y\"z" })
            .unwrap(),
        r#"<p title='say "hi"' alt="x'y&quot;z"/>"#
    );
}

#[test]
fn registered_component_keeps_parsed_template() {
    let mut catalog = Catalog::new();
    catalog
        .register("H1", "<h1 class='5xl'>{text}</h1>", "text: str".parse().unwrap())
        .unwrap();
    let component = catalog.get("H1").unwrap();
    assert_eq!(component.root().to_string(), r#"<h1 class="5xl">{text}</h1>"#);
    assert_eq!(component.signature().to_string(), "text: str");
}

#[test]
fn node_and_str_concatenate_to_node() {
    let mut catalog = Catalog::new();
    catalog
        .register(
            "Wrap",
            "<>{children + '!'}</>",
            "children: node".parse().unwrap(),
        )
        .unwrap();
    catalog
        .register("Use", "<Wrap><b>hi</b></Wrap>", Signature::new())
        .unwrap();
    assert_eq!(catalog.render("Use", args! {}).unwrap(), "<b>hi</b>!");
}

#[test]
fn list_renders_as_concatenation() {
    let catalog = Catalog::new();
    let out = catalog
        .render_source("<p>{xs}</p>", args! { "xs" => vec![1, 2, 3] })
        .unwrap();
    assert_eq!(out, "<p>123</p>");
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from(true).kind(), ValueKind::Bool);
    assert_eq!(Value::from(7_u32), Value::Int(7));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Bool(true).as_int(), Some(1));
    assert!(!Value::from("").is_truthy());
    assert!(Value::Int(0).is_truthy());
    assert!(!Value::Node(Markup::default()).is_truthy());
    assert!(Value::Node(Markup::new("<br/>")).is_truthy());

    let map = BTreeMap::from([("k".to_string(), Value::Int(1))]);
    let record = Value::from(map);
    assert_eq!(record.as_record().and_then(|r| r.field("k")), Some(Value::Int(1)));
}

#[test]
fn param_type_serializes_as_text() {
    let ty: ParamType = "int | bool | str".parse().unwrap();
    let json = serde_json::to_string(&ty).unwrap();
    assert_eq!(json, r#""int | bool | str""#);
    let back: ParamType = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ty);
    assert!(serde_json::from_str::<ParamType>(r#""float""#).is_err());
}

#[test]
fn param_types_built_in_code_match_their_text() {
    let ty = ParamType::int().or(ParamKind::Bool).or(ParamKind::Int);
    assert_eq!(ty, "int | bool".parse::<ParamType>().unwrap());
    assert_eq!(ParamType::record_of("User"), "record<User>".parse::<ParamType>().unwrap());

    let signature = Signature::new()
        .param("user", ParamType::record_of("User"))
        .param("count", ParamType::int().or(ParamKind::Str));
    assert_eq!(signature.to_string(), "user: record<User>, count: int | str");
    assert!(ParamType::record_of("User").accepts(&Value::record(User {
        username: "bob".to_string(),
    })));
}
