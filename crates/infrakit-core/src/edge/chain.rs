//! Handler chain builder
//!
//! ```text
//! Empty ──push──▶ Building ──push──▶ Building
//!   │                │
//!   └─────build──────┴──build──▶ Built (push/build fail with AlreadyBuilt)
//! ```
//!
//! A failed build (e.g. unknown handler) leaves the chain where it was.

use tracing::debug;

use super::compiler::compile;
use super::function::CompiledFunction;
use super::handler::Handler;
use super::stage::Stage;
use crate::error::{Error, Result};
use crate::traits::HandlerSource;

/// Builder state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainState {
    /// No handler appended yet
    Empty,
    /// Handlers appended in order
    Building(Vec<Handler>),
    /// Compiled; no further changes
    Built,
}

/// Ordered handlers sharing one stage, compiled exactly once
///
/// # Example
///
/// ```rust
/// use infrakit_core::catalog::BuiltinCatalog;
/// use infrakit_core::edge::{Handler, HandlerChain, Stage};
///
/// let mut chain = HandlerChain::new("site-request", Stage::ViewerRequest);
/// chain.push(Handler::builtin("indexRewriteHandler")).unwrap();
///
/// let function = chain.build(&BuiltinCatalog::new()).unwrap();
/// assert_eq!(function.comment(), "indexRewriteHandler");
/// assert!(chain.push(Handler::builtin("basicAuthHandler")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HandlerChain {
    name: String,
    stage: Stage,
    state: ChainState,
}

impl HandlerChain {
    /// Create an empty chain
    pub fn new(name: impl Into<String>, stage: Stage) -> Self {
        Self {
            name: name.into(),
            stage,
            state: ChainState::Empty,
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage of every handler in the chain
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current builder state
    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Whether the chain has been built
    pub fn is_built(&self) -> bool {
        matches!(self.state, ChainState::Built)
    }

    /// Handlers appended so far
    pub fn handlers(&self) -> &[Handler] {
        match &self.state {
            ChainState::Building(handlers) => handlers,
            ChainState::Empty | ChainState::Built => &[],
        }
    }

    /// Append a handler
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyBuilt`] once the chain is built
    /// - [`Error::InvalidHandler`] for a bad or repeated name
    pub fn push(&mut self, handler: Handler) -> Result<&mut Self> {
        handler.validate()?;

        match &mut self.state {
            ChainState::Built => return Err(Error::already_built(&self.name)),
            ChainState::Empty => self.state = ChainState::Building(vec![handler]),
            ChainState::Building(handlers) => {
                if handlers.iter().any(|h| h.name == handler.name) {
                    return Err(Error::invalid_handler(format!(
                        "{}: already in chain '{}'",
                        handler.name, self.name
                    )));
                }
                handlers.push(handler);
            }
        }

        Ok(self)
    }

    /// Compile the chain and freeze it
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyBuilt`] if called a second time
    /// - any compilation error; the chain keeps its handlers in that case
    pub fn build(&mut self, source: &dyn HandlerSource) -> Result<CompiledFunction> {
        let function = match &self.state {
            ChainState::Built => return Err(Error::already_built(&self.name)),
            ChainState::Empty => compile(&self.name, self.stage, &[], source)?,
            ChainState::Building(handlers) => compile(&self.name, self.stage, handlers, source)?,
        };

        self.state = ChainState::Built;
        debug!(function = %self.name, "handler chain built");

        Ok(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    fn literal(name: &str) -> Handler {
        Handler::with_code(name, format!("function {}(request) {{ return {{request}}; }}", name))
    }

    #[test]
    fn test_state_transitions() {
        let catalog = MemoryCatalog::new();
        let mut chain = HandlerChain::new("f", Stage::ViewerRequest);
        assert_eq!(chain.state(), &ChainState::Empty);

        chain.push(literal("a")).unwrap().push(literal("b")).unwrap();
        assert_eq!(chain.handlers().len(), 2);

        chain.build(&catalog).unwrap();
        assert!(chain.is_built());
        assert!(chain.handlers().is_empty());
    }

    #[test]
    fn test_push_after_build() {
        let catalog = MemoryCatalog::new();
        let mut chain = HandlerChain::new("f", Stage::ViewerRequest);
        chain.build(&catalog).unwrap();

        let err = chain.push(literal("a")).unwrap_err();
        assert!(matches!(err, Error::AlreadyBuilt(name) if name == "f"));
    }

    #[test]
    fn test_second_build_fails() {
        let catalog = MemoryCatalog::new();
        let mut chain = HandlerChain::new("f", Stage::ViewerRequest);
        chain.push(literal("a")).unwrap();
        chain.build(&catalog).unwrap();

        assert!(matches!(chain.build(&catalog), Err(Error::AlreadyBuilt(_))));
    }

    #[test]
    fn test_failed_build_keeps_handlers() {
        let catalog = MemoryCatalog::new();
        let mut chain = HandlerChain::new("f", Stage::ViewerRequest);
        chain.push(Handler::builtin("missing")).unwrap();

        assert!(matches!(chain.build(&catalog), Err(Error::HandlerNotFound { .. })));
        assert!(!chain.is_built());
        assert_eq!(chain.handlers().len(), 1);

        catalog.insert(Stage::ViewerRequest, "missing", "function missing(request) {}");
        assert!(chain.build(&catalog).is_ok());
    }

    #[test]
    fn test_duplicate_push_rejected() {
        let mut chain = HandlerChain::new("f", Stage::ViewerRequest);
        chain.push(literal("a")).unwrap();
        assert!(matches!(chain.push(literal("a")), Err(Error::InvalidHandler(_))));
    }
}
