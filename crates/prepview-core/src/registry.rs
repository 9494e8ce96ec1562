//! Method registry: name -> (handler factory, parameter schema).
//!
//! The registry is populated once and then only read. It has no removal
//! operation; share it behind `&` or `Arc` across threads.

use std::collections::HashMap;
use std::fmt;

use crate::error::InvokeError;
use crate::handler::{
    factory, ColorJitter, GaussianBlur, GrayScale, HandlerFactory, Solarize, TransformMethod,
};
use crate::params::ParameterSet;
use crate::schema::ParameterSchema;

/// One registered method.
#[derive(Clone)]
pub struct MethodEntry {
    pub factory: HandlerFactory,
    pub schema: ParameterSchema,
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Registry of named transform methods.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    entries: HashMap<String, MethodEntry>,
    /// Registration order, for listing.
    order: Vec<String>,
}

impl MethodRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in methods.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let results = [
            registry.register_method::<ColorJitter>(),
            registry.register_method::<GrayScale>(),
            registry.register_method::<Solarize>(),
            registry.register_method::<GaussianBlur>(),
        ];
        for err in results.into_iter().filter_map(Result::err) {
            tracing::error!(error = %err, "Built-in method registration failed");
        }
        registry
    }

    /// Registers a factory and schema under `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::DuplicateMethod` if `name` is already taken.
    pub fn register(
        &mut self,
        name: &str,
        factory: HandlerFactory,
        schema: ParameterSchema,
    ) -> Result<(), InvokeError> {
        if self.entries.contains_key(name) {
            return Err(InvokeError::DuplicateMethod {
                method: name.to_string(),
            });
        }
        tracing::debug!(method = name, params = schema.len(), "Registered method");
        self.entries
            .insert(name.to_string(), MethodEntry { factory, schema });
        self.order.push(name.to_string());
        Ok(())
    }

    /// Registers a [`TransformMethod`] under its own name.
    pub fn register_method<M: TransformMethod>(&mut self) -> Result<(), InvokeError> {
        self.register(M::NAME, factory::<M>, M::schema())
    }

    /// Looks up a method by name.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::UnknownMethod` if nothing is registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<&MethodEntry, InvokeError> {
        self.entries
            .get(name)
            .ok_or_else(|| InvokeError::UnknownMethod {
                method: name.to_string(),
            })
    }

    /// Returns true if a method name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Method names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, schema)` pairs in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &ParameterSchema)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), &e.schema)))
    }

    /// Declared defaults of a method.
    pub fn defaults(&self, name: &str) -> Result<ParameterSet, InvokeError> {
        let entry = self.lookup(name)?;
        Ok(ParameterSet::defaults(name, &entry.schema))
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
