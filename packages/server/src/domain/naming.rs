//! Display-name rules.
//!
//! This module contains pure functions that implement the naming business
//! logic without side effects, making them easy to test. The registry calls
//! them inside its critical section.

use std::collections::HashSet;

/// Maximum length of a display name, in characters
pub const DISPLAY_NAME_MAX_CHARS: usize = 32;

/// Placeholder substituted for an empty desired name
pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// Normalize a desired display name.
///
/// Truncates to [`DISPLAY_NAME_MAX_CHARS`] characters (on a char boundary)
/// and substitutes [`DEFAULT_DISPLAY_NAME`] for an empty input.
///
/// # Arguments
///
/// * `desired` - The raw name requested by the client
///
/// # Returns
///
/// The normalized base name, never empty
pub fn sanitize_display_name(desired: &str) -> String {
    let base: String = desired.chars().take(DISPLAY_NAME_MAX_CHARS).collect();
    if base.is_empty() {
        DEFAULT_DISPLAY_NAME.to_string()
    } else {
        base
    }
}

/// Resolve a name collision by suffixing `#2`, `#3`, ...
///
/// Returns `base` unchanged when it is not taken; otherwise appends the
/// smallest suffix `#n` with `n >= 2` that produces an unused name.
///
/// # Arguments
///
/// * `base` - Normalized base name (see [`sanitize_display_name`])
/// * `taken` - Display names currently held by other active identities
pub fn dedupe_display_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut i = 2;
    loop {
        let candidate = format!("{}#{}", base, i);
        if !taken.contains(&candidate) {
            return candidate;
        }
        i += 1;
    }
}
