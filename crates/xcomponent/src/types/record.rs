use std::collections::{BTreeMap, HashMap};

use crate::types::Value;

/// Named-field lookup for values used with member access (`user.name`).
///
/// Implemented for string-keyed maps. Host types implement it by hand:
///
/// ```
/// use xcomponent::{Record, Value};
///
/// struct User {
///     username: String,
/// }
///
/// impl Record for User {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "username" => Some(self.username.clone().into()),
///             _ => None,
///         }
///     }
///
///     fn field_names(&self) -> Vec<String> {
///         vec!["username".to_string()]
///     }
///
///     fn type_name(&self) -> &str {
///         "User"
///     }
/// }
/// ```
pub trait Record: Send + Sync {
    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<Value>;

    /// Names of the available fields, used for "did you mean" suggestions.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Type name matched by `record<T>` parameter types.
    fn type_name(&self) -> &str {
        "record"
    }
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}
