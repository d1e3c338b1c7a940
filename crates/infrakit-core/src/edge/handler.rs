//! Handler descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// One unit of logic in a handler chain
///
/// The name doubles as the JavaScript function the dispatcher calls, so it
/// must be a plain identifier. Without `code`, the source is loaded from the
/// handler catalog and `replacements` are applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handler {
    /// Function name inside the handler source
    pub name: String,

    /// Literal source, used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Placeholder token -> replacement, applied to catalog source
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub replacements: BTreeMap<String, String>,
}

impl Handler {
    /// Reference a catalog handler by name
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            replacements: BTreeMap::new(),
        }
    }

    /// Create a handler with literal source
    pub fn with_code(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: Some(code.into()),
            replacements: BTreeMap::new(),
        }
    }

    /// Add a placeholder replacement
    pub fn replace(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.replacements.insert(token.into(), value.into());
        self
    }

    /// Check the handler can be emitted into a dispatcher
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.name)?;

        if self.replacements.keys().any(|token| token.is_empty()) {
            return Err(Error::invalid_handler(format!(
                "{}: replacement tokens cannot be empty",
                self.name
            )));
        }

        Ok(())
    }
}

/// Check that a handler name is a JavaScript identifier
///
/// Restricted to ASCII letters, digits, `_` and `$`, not starting with a digit.
/// This also keeps names usable as catalog file names.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();

    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };

    if !valid {
        return Err(Error::invalid_handler(format!(
            "'{}' is not a valid handler function name",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(validate_identifier("indexRewriteHandler").is_ok());
        assert!(validate_identifier("_h1").is_ok());
        assert!(validate_identifier("$h").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1handler").is_err());
        assert!(validate_identifier("../secret").is_err());
        assert!(validate_identifier("a-b").is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let handler = Handler::builtin("basicAuthHandler").replace("", "x");
        assert!(handler.validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal() {
        let handler: Handler = serde_json::from_str(r#"{"name": "indexRewriteHandler"}"#).unwrap();
        assert_eq!(handler, Handler::builtin("indexRewriteHandler"));
    }
}
