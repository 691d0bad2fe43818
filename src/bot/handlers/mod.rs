//! Discord interaction handlers shared by the command modules.

/// Autocomplete for draft titles and timezones
pub mod autocomplete;
/// Step prompt and outcome rendering
pub mod prompts;
