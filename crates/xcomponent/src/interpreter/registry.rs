//! Registries for components and functions.

use std::collections::HashMap;

use crate::interpreter::{CatalogError, Component};
use crate::types::Function;

/// Components of one catalog, in registration order.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: Vec<Component>,
    /// Maps component name to its index in `components`.
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Get a component by name.
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert a component.
    ///
    /// Returns an error if a component with the same name exists.
    pub fn insert(&mut self, component: Component) -> Result<(), CatalogError> {
        if self.index.contains_key(component.name()) {
            return Err(CatalogError::DuplicateComponent {
                name: component.name().to_string(),
            });
        }
        self.index
            .insert(component.name().to_string(), self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(Component::name)
    }
}

/// Host functions callable from templates by name.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Insert a function.
    ///
    /// Returns an error if a function with the same name exists.
    pub fn insert(&mut self, name: impl Into<String>, function: Function) -> Result<(), CatalogError> {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(CatalogError::DuplicateFunction { name });
        }
        self.functions.insert(name, function);
        Ok(())
    }

    /// Function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
