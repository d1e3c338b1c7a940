//! Pipeline stages of an edge function

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The CDN event an edge function is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Inbound: runs before the cache lookup, sees the request
    ViewerRequest,
    /// Outbound: runs before the response is returned, sees the response
    ViewerResponse,
}

impl Stage {
    /// Event type name, also the catalog directory of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ViewerRequest => "viewer-request",
            Stage::ViewerResponse => "viewer-response",
        }
    }

    /// Field of the handler result (and of the event) carrying the object
    pub fn object_field(&self) -> &'static str {
        match self {
            Stage::ViewerRequest => "request",
            Stage::ViewerResponse => "response",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer-request" => Ok(Stage::ViewerRequest),
            "viewer-response" => Ok(Stage::ViewerResponse),
            other => Err(Error::invalid_input(format!(
                "Unknown stage '{}' (expected viewer-request or viewer-response)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::ViewerRequest.to_string(), "viewer-request");
        assert_eq!(Stage::ViewerResponse.object_field(), "response");
        assert_eq!("viewer-response".parse::<Stage>().unwrap(), Stage::ViewerResponse);
        assert!("origin-request".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_serde() {
        let stage: Stage = serde_json::from_str("\"viewer-request\"").unwrap();
        assert_eq!(stage, Stage::ViewerRequest);
    }
}
