//! Rule handlers and the registry that resolves rule names to them.
//!
//! A registry is an explicit value handed to the parser. Validators copy out the
//! handler references they need at construction, so registering or replacing a
//! handler later never changes an existing validator. Hosts that mutate a shared
//! registry from several threads wrap it in their own lock.

use crate::error::ValidationError;
use crate::types::Param;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single named leaf rule.
///
/// Implementations are small stateless values. `validate` must be pure: it returns
/// an error value on failure and never panics on unexpected input shapes.
pub trait RuleHandler: Send + Sync {
    /// Unique lowercase name matching `^[a-z][a-z0-9_]*$`.
    fn name(&self) -> &str;

    /// Checks `value` (absent when the path did not resolve) located at `field`.
    fn validate(
        &self,
        value: Option<&Value>,
        params: &[Param],
        record: &Value,
        field: &str,
    ) -> Option<ValidationError>;

    /// Stop the rule list currently executing when this rule fails.
    fn bail_on_failure(&self) -> bool {
        false
    }

    /// Do not run this rule at all when the value is empty.
    fn skip_if_empty(&self) -> bool {
        true
    }

    /// Validates the declared parameters once, at construction time.
    fn check_params(&self, _params: &[Param]) -> Result<(), String> {
        Ok(())
    }

    /// Compile plain string parameters into patterns at construction time.
    fn compiles_patterns(&self) -> bool {
        false
    }
}

/// Name → handler lookup table.
#[derive(Clone)]
pub struct RuleRegistry {
    handlers: HashMap<String, Arc<dyn RuleHandler>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        RuleRegistry {
            handlers: HashMap::new(),
        }
    }

    /// A registry seeded with every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = RuleRegistry::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    /// Adds a handler under its own name, returning any handler it replaced.
    pub fn register<H: RuleHandler + 'static>(&mut self, handler: H) -> Option<Arc<dyn RuleHandler>> {
        self.register_shared(Arc::new(handler))
    }

    pub fn register_shared(&mut self, handler: Arc<dyn RuleHandler>) -> Option<Arc<dyn RuleHandler>> {
        let name = handler.name().to_string();
        let previous = self.handlers.insert(name.clone(), handler);
        if previous.is_some() {
            tracing::debug!(rule = %name, "replaced registered rule handler");
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn RuleHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        RuleRegistry::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.list_names())
            .finish()
    }
}
