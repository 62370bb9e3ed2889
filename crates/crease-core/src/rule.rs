//! The pluggable rule contract

use serde_json::Value;

use crate::diagnostics::ErrorCollector;
use crate::result::Result;
use crate::tokenized_file::TokenizedFile;

/// Read-only cross-cutting flags shared by every `check` call
///
/// Flags that several rules consult (currently the language-feature
/// toggle) live here instead of in any rule's own options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckContext {
    /// Next-generation language features are enabled (`esnext` config key)
    pub es_next: bool,
}

/// A style rule: a named, independently configured check over one file
///
/// `configure` always runs to completion (success or failure) before
/// `check` is ever invoked. `check` must treat the file as read-only and
/// must not depend on other rules or on its registration position.
pub trait Rule: Send + Sync {
    /// Unique rule name; doubles as the configuration key
    fn name(&self) -> &'static str;

    /// Validate the raw options value and derive the state `check` needs
    ///
    /// Fails with a configuration error naming the offending
    /// key/constraint for any invalid shape.
    fn configure(&mut self, options: &Value) -> Result<()>;

    /// Inspect one file, registering violations into the collector
    fn check(&self, file: &TokenizedFile, context: &CheckContext, errors: &mut ErrorCollector<'_>);
}
