//! Tests for catalogs imported as namespaces.

use std::sync::Arc;

use xcomponent::{Catalog, CatalogError, ErrorKind, EvalError, Function, ParamType, Value, args};

fn base_catalog() -> Arc<Catalog> {
    let mut base = Catalog::builder().name("base").build();
    base.register(
        "H1",
        "<h1 class='xl'>{title}</h1>",
        "title: str".parse().unwrap(),
    )
    .unwrap();
    base.register("H2", "<h2>{title}</h2>", "title: str".parse().unwrap())
        .unwrap();
    base.register(
        "Header",
        "<header><H1 title={title}/></header>",
        "title: str".parse().unwrap(),
    )
    .unwrap();
    base.register(
        "Content",
        "<main>{children}</main>",
        "children: node".parse().unwrap(),
    )
    .unwrap();
    base.register_function(
        "shout",
        Function::new(vec![ParamType::str()], ParamType::str(), |args| {
            Ok(Value::Str(args[0].to_string().to_uppercase()))
        }),
    )
    .unwrap();
    Arc::new(base)
}

fn layout_catalog(base: Arc<Catalog>) -> Arc<Catalog> {
    let mut layout = Catalog::builder().name("layout").build();
    layout.use_namespace("base", base).unwrap();
    layout
        .register(
            "Html",
            "<html><base.Header title={title}/><base.Content>{children}</base.Content></html>",
            "title: str, children: node".parse().unwrap(),
        )
        .unwrap();
    Arc::new(layout)
}

#[test]
fn namespaced_component_with_case_insensitive_close() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    page.register(
        "Page",
        "<html><base.H1 title={title}></base.h1></html>",
        "title: str".parse().unwrap(),
    )
    .unwrap();

    let out = page.render("Page", args! { "title" => "yolo" }).unwrap();
    assert_eq!(out, r#"<html><h1 class="xl">yolo</h1></html>"#);
}

#[test]
fn multi_level_namespaces() {
    let base = base_catalog();
    let mut app = Catalog::builder().name("app").build();
    app.use_namespace("layout", layout_catalog(Arc::clone(&base)))
        .unwrap();
    app.register(
        "Page3",
        "<layout.Html title={title}><p>{body}</p></layout.Html>",
        "title: str, body: str".parse().unwrap(),
    )
    .unwrap();

    let out = app
        .render("Page3", args! { "title" => "Home", "body" => "Welcome" })
        .unwrap();
    assert_eq!(
        out,
        r#"<html><header><h1 class="xl">Home</h1></header><main><p>Welcome</p></main></html>"#
    );
}

#[test]
fn dotted_chain_reaches_nested_namespace() {
    let base = base_catalog();
    let mut app = Catalog::new();
    app.use_namespace("layout", layout_catalog(base)).unwrap();
    app.register(
        "Deep",
        "<layout.base.H2 title={t}/>",
        "t: str".parse().unwrap(),
    )
    .unwrap();

    assert_eq!(
        app.render("Deep", args! { "t" => "x" }).unwrap(),
        "<h2>x</h2>"
    );
}

#[test]
fn render_dotted_name_directly() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    let out = page
        .render("base.H2", args! { "title" => "direct" })
        .unwrap();
    assert_eq!(out, "<h2>direct</h2>");
}

#[test]
fn namespaced_function_call() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    page.register("Loud", "<>{base.shout(word)}</>", "word: str".parse().unwrap())
        .unwrap();
    assert_eq!(
        page.render("Loud", args! { "word" => "hey" }).unwrap(),
        "HEY"
    );
}

#[test]
fn namespaces_are_not_inherited() {
    // `layout` imports `base`, but `app` does not.
    let mut app = Catalog::new();
    app.use_namespace("layout", layout_catalog(base_catalog()))
        .unwrap();
    app.register("Bad", "<base.H1 title='x'/>", "".parse().unwrap())
        .unwrap();

    let err = app.render("Bad", args! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    let EvalError::UnresolvedReference { name, .. } = err else {
        panic!("expected unresolved reference");
    };
    assert_eq!(name, "base");
}

#[test]
fn unknown_component_in_namespace_suggests_names() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    page.register("Typo", "<base.H3 title='x'/>", "".parse().unwrap())
        .unwrap();

    let err = page.render("Typo", args! {}).unwrap_err();
    let EvalError::UnresolvedReference { name, suggestions } = err else {
        panic!("expected unresolved reference");
    };
    assert_eq!(name, "base.H3");
    assert_eq!(suggestions, vec!["H1", "H2"]);
}

#[test]
fn local_component_wins_over_namespace() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    page.register("H1", "<h1>local {title}</h1>", "title: str".parse().unwrap())
        .unwrap();
    page.register("Page", "<H1 title='x'/>", "".parse().unwrap())
        .unwrap();
    assert_eq!(page.render("Page", args! {}).unwrap(), "<h1>local x</h1>");
}

#[test]
fn duplicate_namespace_is_rejected() {
    let mut page = Catalog::new();
    page.use_namespace("base", base_catalog()).unwrap();
    let err = page.use_namespace("base", base_catalog()).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateNamespace { name } if name == "base"));
}

#[test]
fn forward_reference_resolves_at_render_time() {
    let mut catalog = Catalog::new();
    catalog
        .register("Outer", "<div><Inner/></div>", "".parse().unwrap())
        .unwrap();
    catalog
        .register("Inner", "<span>in</span>", "".parse().unwrap())
        .unwrap();
    assert_eq!(
        catalog.render("Outer", args! {}).unwrap(),
        "<div><span>in</span></div>"
    );
}
