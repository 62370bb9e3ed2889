//! Crease Rules
//!
//! Builtin style rules for the Crease style checker. Each rule is an
//! independent [`crease_core::Rule`] implementation keyed by its
//! configuration name; [`register_default_rules`] installs the whole
//! catalog into a checker.

use crease_core::checker::Checker;
use crease_core::rule::Rule;
use crease_core::Result;

pub mod disallow_quoted_keys_in_objects;
pub mod require_padding_newlines_before_line_comments;
pub mod require_spaces_in_function;
pub mod require_spread;

pub use disallow_quoted_keys_in_objects::DisallowQuotedKeysInObjects;
pub use require_padding_newlines_before_line_comments::RequirePaddingNewlinesBeforeLineComments;
pub use require_spaces_in_function::RequireSpacesInFunction;
pub use require_spread::RequireSpread;

/// Fresh instances of every builtin rule
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RequireSpacesInFunction::new()),
        Box::new(DisallowQuotedKeysInObjects::new()),
        Box::new(RequireSpread::new()),
        Box::new(RequirePaddingNewlinesBeforeLineComments::new()),
    ]
}

/// Register the builtin catalog into a checker
pub fn register_default_rules(checker: &mut Checker) -> Result<()> {
    for rule in default_rules() {
        checker.register_rule(rule)?;
    }
    Ok(())
}
