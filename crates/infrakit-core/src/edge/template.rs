//! Placeholder substitution over handler source

use std::collections::BTreeMap;
use tracing::warn;

/// Apply placeholder replacements to `source`
///
/// Each token is replaced at its first occurrence only, in key order. Tokens
/// that do not occur leave the source untouched and are logged.
pub fn apply_replacements(source: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut output = source.to_string();

    for (token, value) in replacements {
        if output.contains(token.as_str()) {
            output = output.replacen(token.as_str(), value, 1);
        } else {
            warn!(token = %token, "placeholder not found in handler source");
        }
    }

    output
}
