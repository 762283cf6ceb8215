//! Tests for error types and error message formatting.

use xcomponent::{
    Catalog, CatalogError, ErrorKind, EvalError, ParseError, Signature, Value, args,
    compute_suggestions,
};

#[test]
fn compute_suggestions_finds_similar_names() {
    let available = ["title", "subtitle", "items", "user"];

    let suggestions = compute_suggestions("titel", available);
    assert_eq!(suggestions, vec!["title"]);

    let suggestions = compute_suggestions("usr", available);
    assert_eq!(suggestions, vec!["user"]);

    assert!(compute_suggestions("xyz", available).is_empty());
}

#[test]
fn compute_suggestions_limits_to_three() {
    let available: Vec<String> = (0..10).map(|i| format!("item{i}")).collect();
    let suggestions = compute_suggestions("item", available.iter().map(String::as_str));
    assert_eq!(suggestions.len(), 3);
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn parse_error_names_the_component() {
    let mut catalog = Catalog::new();
    let err = catalog
        .register("Broken", "<div>\n  <p>{a +}</p>\n</div>", Signature::new())
        .unwrap_err();
    let CatalogError::Parse { name, source } = &err else {
        panic!("expected parse error, got {err:?}");
    };
    assert_eq!(name, "Broken");
    assert_eq!(source.line(), 2);
    assert!(err.to_string().starts_with("component 'Broken': syntax error at 2:"));
}

#[test]
fn duplicate_component_is_rejected() {
    let mut catalog = Catalog::new();
    catalog.register("A", "<p/>", Signature::new()).unwrap();
    let err = catalog.register("A", "<div/>", Signature::new()).unwrap_err();
    assert_eq!(err.to_string(), "component 'A' is already registered");
}

#[test]
fn invalid_signature() {
    assert!("a: int, a: str".parse::<Signature>().is_err());
    assert!("a: integer".parse::<Signature>().is_err());
    assert!(matches!(
        "1a: int".parse::<Signature>(),
        Err(ParseError::Syntax { line: 1, .. })
    ));
}

// =============================================================================
// Binding
// =============================================================================

fn greeting_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register(
            "Greeting",
            "<p>{greeting}, {name}</p>",
            r#"name: str, greeting: str = "Hello""#.parse().unwrap(),
        )
        .unwrap();
    catalog
}

#[test]
fn default_is_used_for_missing_argument() {
    let out = greeting_catalog()
        .render("Greeting", args! { "name" => "Ada" })
        .unwrap();
    assert_eq!(out, "<p>Hello, Ada</p>");
}

#[test]
fn missing_argument() {
    let err = greeting_catalog().render("Greeting", args! {}).unwrap_err();
    assert_eq!(
        err.to_string(),
        "component 'Greeting' is missing argument 'name'"
    );
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn unexpected_argument() {
    let err = greeting_catalog()
        .render("Greeting", args! { "name" => "Ada", "age" => 3 })
        .unwrap_err();
    assert!(matches!(err, EvalError::UnexpectedArgument { ref param, .. } if param == "age"));
}

#[test]
fn argument_of_wrong_kind() {
    let err = greeting_catalog()
        .render("Greeting", args! { "name" => 3 })
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument 'name' of 'Greeting' expects str, got int"
    );
}

#[test]
fn text_that_is_not_a_number_is_rejected_for_int() {
    let mut catalog = Catalog::new();
    catalog
        .register("Count", "<>{n}</>", "n: int".parse().unwrap())
        .unwrap();
    catalog
        .register("Caller", "<Count n='many'/>", Signature::new())
        .unwrap();
    let err = catalog.render("Caller", args! {}).unwrap_err();
    assert!(matches!(err, EvalError::ArgumentType { .. }));
}

#[test]
fn children_passed_to_component_without_children_param() {
    let mut catalog = Catalog::new();
    catalog.register("Leaf", "<br/>", Signature::new()).unwrap();
    catalog
        .register("Blank", "<Leaf>\n    </Leaf>", Signature::new())
        .unwrap();
    catalog
        .register("Full", "<Leaf>text</Leaf>", Signature::new())
        .unwrap();

    assert_eq!(catalog.render("Blank", args! {}).unwrap(), "<br/>");
    let err = catalog.render("Full", args! {}).unwrap_err();
    assert!(matches!(err, EvalError::UnexpectedArgument { ref param, .. } if param == "children"));
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn unresolved_identifier_with_suggestion() {
    let mut catalog = Catalog::new();
    catalog
        .register("Title", "<h1>{titel}</h1>", "title: str".parse().unwrap())
        .unwrap();
    let err = catalog
        .render("Title", args! { "title" => "x" })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    assert_eq!(
        err.to_string(),
        "unresolved reference 'titel', did you mean: title?"
    );
}

#[test]
fn unresolved_field_suggests_fields() {
    let mut catalog = Catalog::new();
    catalog
        .register("Name", "<>{user.nmae}</>", "user: record".parse().unwrap())
        .unwrap();
    let user = Value::from(args! { "name" => "bob", "email" => "b@x" });
    let err = catalog.render("Name", args! { "user" => user }).unwrap_err();
    let EvalError::UnresolvedReference { name, suggestions } = err else {
        panic!("expected unresolved reference");
    };
    assert_eq!(name, "user.nmae");
    assert_eq!(suggestions, vec!["name"]);
}

#[test]
fn unknown_component_name() {
    let err = Catalog::new().render("Missing", args! {}).unwrap_err();
    assert!(matches!(err, EvalError::UnresolvedReference { ref name, .. } if name == "Missing"));
}

#[test]
fn undotted_unknown_tag_is_plain_html() {
    let catalog = Catalog::new();
    let out = catalog
        .render_source("<custom-tag a='1'>x</custom-tag>", args! {})
        .unwrap();
    assert_eq!(out, r#"<custom-tag a="1">x</custom-tag>"#);
}

// =============================================================================
// Recursion
// =============================================================================

#[test]
fn self_recursion_hits_depth_limit() {
    let mut catalog = Catalog::builder().max_depth(5).build();
    assert_eq!(catalog.max_depth(), 5);
    assert_eq!(Catalog::new().max_depth(), 64);
    catalog.register("Loop", "<div><Loop/></div>", Signature::new()).unwrap();

    let err = catalog.render("Loop", args! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecursionLimit);
    let EvalError::RecursionLimit { max_depth, chain } = &err else {
        panic!("expected recursion limit");
    };
    assert_eq!(*max_depth, 5);
    assert_eq!(chain.len(), 6);
    assert!(chain.iter().all(|name| name == "Loop"));
}

#[test]
fn mutual_recursion_reports_chain() {
    let mut catalog = Catalog::builder().name("app").max_depth(3).build();
    catalog.register("Ping", "<Pong/>", Signature::new()).unwrap();
    catalog.register("Pong", "<Ping/>", Signature::new()).unwrap();

    let err = catalog.render("Ping", args! {}).unwrap_err();
    assert_eq!(
        err.to_string(),
        "maximum component depth 3 exceeded: app.Ping -> app.Pong -> app.Ping -> app.Pong"
    );
}

#[test]
fn deep_but_finite_nesting_renders() {
    let mut catalog = Catalog::builder().max_depth(3).build();
    catalog.register("A", "<B/>", Signature::new()).unwrap();
    catalog.register("B", "<C/>", Signature::new()).unwrap();
    catalog.register("C", "<i>c</i>", Signature::new()).unwrap();
    assert_eq!(catalog.render("A", args! {}).unwrap(), "<i>c</i>");
}

#[test]
fn rendering_a_record_fails() {
    let mut catalog = Catalog::new();
    catalog
        .register("Show", "<>{user}</>", "user: record".parse().unwrap())
        .unwrap();
    let user = Value::from(args! { "name" => "bob" });
    let err = catalog.render("Show", args! { "user" => user }).unwrap_err();
    assert_eq!(err.to_string(), "Cannot render record value");
}
