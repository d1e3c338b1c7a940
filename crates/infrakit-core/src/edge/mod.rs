//! Chained edge functions
//!
//! Handlers are appended to a [`HandlerChain`] and compiled into a single
//! [`CompiledFunction`] whose dispatcher runs them in order, stopping early
//! when a handler sets `stop`.

pub mod chain;
pub mod compiler;
pub mod function;
pub mod handler;
pub mod presets;
pub mod stage;
pub mod template;

pub use chain::{ChainState, HandlerChain};
pub use compiler::compile;
pub use function::{CompiledFunction, EDGE_RUNTIME};
pub use handler::Handler;
pub use presets::{ViewerRequestFunction, ViewerResponseFunction};
pub use stage::Stage;
pub use template::apply_replacements;
