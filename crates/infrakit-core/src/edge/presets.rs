// # Preset Edge Functions
//
// Typed front ends over `HandlerChain` for the handlers shipped in the
// built-in catalog.
//
// ## Viewer Request
//
// - `indexRewriteHandler`: appends `index.html` to directory-like URIs
// - `basicAuthHandler`: HTTP basic auth, stops the chain with a 401
//
// ## Viewer Response
//
// - `cacheControlHandler`: sets `cache-control` (immutable or revalidate)
// - `securityHeadersHandler`: HSTS, nosniff, frame and referrer policies

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::chain::HandlerChain;
use super::function::CompiledFunction;
use super::handler::Handler;
use super::stage::Stage;
use crate::error::Result;
use crate::traits::HandlerSource;

/// Catalog name of the index rewrite handler
pub const INDEX_REWRITE_HANDLER: &str = "indexRewriteHandler";

/// Catalog name of the basic auth handler
pub const BASIC_AUTH_HANDLER: &str = "basicAuthHandler";

/// Catalog name of the cache control handler
pub const CACHE_CONTROL_HANDLER: &str = "cacheControlHandler";

/// Catalog name of the security headers handler
pub const SECURITY_HEADERS_HANDLER: &str = "securityHeadersHandler";

/// Placeholder for the base64 `user:password` credentials
pub const BASIC_AUTH_TOKEN: &str = "__BASIC_AUTH__";

/// Placeholder for the immutable flag (`true` / `false`)
pub const IMMUTABLE_TOKEN: &str = "__IMMUTABLE__";

/// Edge function processing viewer requests
#[derive(Debug, Clone)]
pub struct ViewerRequestFunction {
    chain: HandlerChain,
}

impl ViewerRequestFunction {
    /// Create an empty viewer-request function
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chain: HandlerChain::new(name, Stage::ViewerRequest),
        }
    }

    /// Append `index.html` to URIs ending in `/` or lacking a file extension
    pub fn with_index_rewrite(&mut self) -> Result<&mut Self> {
        self.chain.push(Handler::builtin(INDEX_REWRITE_HANDLER))?;
        Ok(self)
    }

    /// Require HTTP basic auth; a failed check stops the chain
    pub fn with_basic_auth(&mut self, username: &str, password: &str) -> Result<&mut Self> {
        let credentials = STANDARD.encode(format!("{}:{}", username, password));
        self.chain
            .push(Handler::builtin(BASIC_AUTH_HANDLER).replace(BASIC_AUTH_TOKEN, credentials))?;
        Ok(self)
    }

    /// Append any handler
    pub fn custom_handler(&mut self, handler: Handler) -> Result<&mut Self> {
        self.chain.push(handler)?;
        Ok(self)
    }

    /// Compile the function
    pub fn build(&mut self, source: &dyn HandlerSource) -> Result<CompiledFunction> {
        self.chain.build(source)
    }
}

/// Edge function processing viewer responses
#[derive(Debug, Clone)]
pub struct ViewerResponseFunction {
    chain: HandlerChain,
}

impl ViewerResponseFunction {
    /// Create an empty viewer-response function
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chain: HandlerChain::new(name, Stage::ViewerResponse),
        }
    }

    /// Set browser caching; immutable resources are cached for up to a year
    pub fn with_cache_control(&mut self, immutable: bool) -> Result<&mut Self> {
        self.chain.push(
            Handler::builtin(CACHE_CONTROL_HANDLER).replace(IMMUTABLE_TOKEN, immutable.to_string()),
        )?;
        Ok(self)
    }

    /// Add common security headers to every response
    pub fn with_security_headers(&mut self) -> Result<&mut Self> {
        self.chain.push(Handler::builtin(SECURITY_HEADERS_HANDLER))?;
        Ok(self)
    }

    /// Append any handler
    pub fn custom_handler(&mut self, handler: Handler) -> Result<&mut Self> {
        self.chain.push(handler)?;
        Ok(self)
    }

    /// Compile the function
    pub fn build(&mut self, source: &dyn HandlerSource) -> Result<CompiledFunction> {
        self.chain.build(source)
    }
}
