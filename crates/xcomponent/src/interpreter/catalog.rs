//! Component catalogs.
//!
//! A [`Catalog`] owns registered components and functions, imports other
//! catalogs as namespaces, and renders components by name or ad-hoc
//! templates.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use bon::Builder;
use tracing::{debug, info};

use crate::interpreter::context::DEFAULT_MAX_DEPTH;
use crate::interpreter::registry::{ComponentRegistry, FunctionRegistry};
use crate::interpreter::{
    CatalogError, Component, EvalContext, EvalError, compute_suggestions, eval_node,
    render_component,
};
use crate::parser::{Node, parse_markup};
use crate::types::{Function, Signature, Value};

/// A registry of components, functions and imported namespaces.
///
/// A catalog is populated first and rendered from afterwards. Registration
/// needs `&mut self`, rendering only `&self`, so a catalog shared behind an
/// [`Arc`] is frozen and can serve renders from several threads.
///
/// Component and function names are unique within a catalog; registering a
/// name twice is an error. Tag and call names are resolved at render time,
/// so a component may reference another that is registered after it.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use xcomponent::{Catalog, Value};
///
/// let mut catalog = Catalog::builder().name("base").build();
/// catalog
///     .register("H1", r#"<h1 class="xl">{title}</h1>"#, "title: str".parse().unwrap())
///     .unwrap();
///
/// let args = HashMap::from([("title".to_string(), Value::from("Hello"))]);
/// assert_eq!(catalog.render("H1", args).unwrap(), r#"<h1 class="xl">Hello</h1>"#);
/// ```
#[derive(Builder)]
pub struct Catalog {
    /// Name used to qualify component names in diagnostics.
    #[builder(into)]
    name: Option<String>,

    /// Maximum nesting of component invocations in one render.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[builder(skip)]
    components: ComponentRegistry,

    #[builder(skip)]
    functions: FunctionRegistry,

    /// Imported catalogs by local name.
    #[builder(skip)]
    namespaces: BTreeMap<String, Arc<Catalog>>,

    /// Cache of parsed templates for `render_source()`.
    ///
    /// Templates are keyed by their source string and reused across calls.
    #[builder(skip)]
    template_cache: RwLock<HashMap<String, Arc<Node>>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builder().build()
    }
}

impl Catalog {
    /// Create an unnamed catalog with the default max depth.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Parse and register a component.
    ///
    /// The template is parsed once here; rendering never re-parses it.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        source: &str,
        signature: Signature,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if self.components.contains(&name) {
            return Err(CatalogError::DuplicateComponent { name });
        }
        let root = parse_markup(source).map_err(|source| CatalogError::Parse {
            name: name.clone(),
            source,
        })?;
        info!(
            catalog = self.name.as_deref().unwrap_or_default(),
            component = %name,
            params = signature.params().len(),
            "registered component"
        );
        self.components
            .insert(Component::new(name, signature, root))
    }

    /// Register a function callable from templates by name.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: Function,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        info!(
            catalog = self.name.as_deref().unwrap_or_default(),
            function = %name,
            "registered function"
        );
        self.functions.insert(name, function)
    }

    /// Import another catalog under a local namespace name.
    ///
    /// Its components become reachable as `<name.Component/>` and its
    /// functions as `name.function(...)` from this catalog only.
    pub fn use_namespace(
        &mut self,
        name: impl Into<String>,
        catalog: Arc<Catalog>,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if self.namespaces.contains_key(&name) {
            return Err(CatalogError::DuplicateNamespace { name });
        }
        info!(
            catalog = self.name.as_deref().unwrap_or_default(),
            namespace = %name,
            "using namespace"
        );
        self.namespaces.insert(name, catalog);
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get a local component by name.
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains(name)
    }

    /// Local components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Get a local function by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Local function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.names()
    }

    /// Get an imported catalog by its local name.
    pub fn namespace(&self, name: &str) -> Option<&Catalog> {
        self.namespaces.get(name).map(AsRef::as_ref)
    }

    /// Imported namespace names, sorted.
    pub fn namespace_names(&self) -> Vec<&str> {
        self.namespaces.keys().map(String::as_str).collect()
    }

    /// Qualify a component name with this catalog's name, if any.
    pub fn qualify(&self, component: &str) -> String {
        match &self.name {
            Some(name) => format!("{name}.{component}"),
            None => component.to_string(),
        }
    }

    /// Resolve a tag to a component and the catalog that owns it.
    ///
    /// Local components are checked first, then dotted names are followed
    /// through the namespace chain. An undotted unknown tag is `Ok(None)`
    /// (it renders as a plain element); a dotted one is an error.
    pub fn resolve_component(
        &self,
        tag: &str,
    ) -> Result<Option<(&Catalog, &Component)>, EvalError> {
        if let Some(component) = self.components.get(tag) {
            return Ok(Some((self, component)));
        }
        let Some((namespace, rest)) = tag.split_once('.') else {
            return Ok(None);
        };
        let Some(catalog) = self.namespace(namespace) else {
            return Err(EvalError::unresolved(namespace, self.namespace_names()));
        };
        debug!(namespace, component = rest, "resolving component in namespace");
        match catalog.resolve_component(rest)? {
            Some(found) => Ok(Some(found)),
            None => Err(EvalError::UnresolvedReference {
                name: tag.to_string(),
                suggestions: compute_suggestions(rest, catalog.components.names()),
            }),
        }
    }

    /// Resolve a function name, following dotted names through namespaces.
    pub fn resolve_function(&self, name: &str) -> Result<&Function, EvalError> {
        let Some((namespace, rest)) = name.split_once('.') else {
            return self
                .functions
                .get(name)
                .ok_or_else(|| EvalError::unresolved(name, self.function_names()));
        };
        let catalog = self
            .namespace(namespace)
            .ok_or_else(|| EvalError::unresolved(namespace, self.namespace_names()))?;
        catalog.resolve_function(rest)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render a component with arguments.
    ///
    /// `name` may be dotted to render a component of an imported namespace.
    pub fn render(&self, name: &str, args: HashMap<String, Value>) -> Result<String, EvalError> {
        self.render_with_globals(name, args, HashMap::new())
    }

    /// Render a component with arguments and globals.
    ///
    /// Globals are visible by name, and together as the `globals` record, in
    /// every component reached by the render, including namespaced ones.
    pub fn render_with_globals(
        &self,
        name: &str,
        args: HashMap<String, Value>,
        globals: HashMap<String, Value>,
    ) -> Result<String, EvalError> {
        let (owner, component) = self
            .resolve_component(name)?
            .ok_or_else(|| EvalError::unresolved(name, self.components.names()))?;
        debug!(component = name, args = args.len(), "render");

        let ctx = EvalContext::with_max_depth(HashMap::new(), Arc::new(globals), self.max_depth);
        let markup = render_component(owner, component, sorted(args), &ctx)?;
        Ok(markup.into_string())
    }

    /// Parse and render an ad-hoc template, e.g. `<H1 text='Hello'/>`.
    ///
    /// `args` are free variables of the template; there is no signature to
    /// check them against. Parsed templates are cached.
    pub fn render_source(
        &self,
        template: &str,
        args: HashMap<String, Value>,
    ) -> Result<String, EvalError> {
        self.render_source_with_globals(template, args, HashMap::new())
    }

    /// Parse and render an ad-hoc template with globals.
    pub fn render_source_with_globals(
        &self,
        template: &str,
        args: HashMap<String, Value>,
        globals: HashMap<String, Value>,
    ) -> Result<String, EvalError> {
        let root = self.cached_template(template)?;
        debug!(args = args.len(), "render source");

        let mut ctx = EvalContext::with_max_depth(args, Arc::new(globals), self.max_depth);
        let mut out = String::new();
        eval_node(&root, &mut ctx, self, &mut out)?;
        Ok(out)
    }

    /// Clear the template cache.
    pub fn clear_template_cache(&self) {
        self.template_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Return the number of cached template ASTs.
    pub fn template_cache_len(&self) -> usize {
        self.template_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Look up or parse and cache a template string.
    fn cached_template(&self, template: &str) -> Result<Arc<Node>, EvalError> {
        {
            let cache = self
                .template_cache
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(root) = cache.get(template) {
                return Ok(Arc::clone(root));
            }
        }
        let root = Arc::new(parse_markup(template)?);
        self.template_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(template.to_string(), Arc::clone(&root));
        Ok(root)
    }
}

/// Order arguments by name so binding errors are deterministic.
fn sorted(args: HashMap<String, Value>) -> Vec<(String, Value)> {
    args.into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect()
}
