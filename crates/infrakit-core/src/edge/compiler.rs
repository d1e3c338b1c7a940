//! Handler chain compilation
//!
//! Turns an ordered list of handlers into one edge function:
//!
//! ```text
//! const handlerChain = [first,second];
//!
//! async function handler(event) { ... dispatcher ... }
//!
//! // ----------- Handler: first -----------
//! function first(request) { ... }
//!
//! // ----------- Handler: second -----------
//! function second(request) { ... }
//! ```
//!
//! The dispatcher calls each handler with the current object. A handler
//! returns `{request, stop}` (or `{response, stop}`); a truthy `stop` returns
//! the object immediately, otherwise it becomes the next handler's input.

use std::collections::HashSet;
use tracing::debug;

use super::function::CompiledFunction;
use super::handler::Handler;
use super::stage::Stage;
use super::template::apply_replacements;
use crate::error::{Error, Result};
use crate::traits::HandlerSource;

/// Prefix of the generated handler list declaration
pub(crate) const CHAIN_DECLARATION: &str = "const handlerChain = [";

/// Compile a handler chain into a single edge function
///
/// All catalog handlers are looked up before any source is assembled, so a
/// missing handler fails the call without partial work.
///
/// # Errors
///
/// - [`Error::InvalidHandler`]: bad or duplicate handler name
/// - [`Error::HandlerNotFound`]: no catalog entry for a handler without code
pub fn compile(
    name: &str,
    stage: Stage,
    handlers: &[Handler],
    source: &dyn HandlerSource,
) -> Result<CompiledFunction> {
    let mut seen = HashSet::new();
    for handler in handlers {
        handler.validate()?;
        if !seen.insert(handler.name.as_str()) {
            return Err(Error::invalid_handler(format!(
                "{}: listed twice in chain '{}'",
                handler.name, name
            )));
        }
    }

    // Resolve every catalog entry up front
    let mut catalog_sources = Vec::with_capacity(handlers.len());
    for handler in handlers {
        let loaded = match handler.code {
            Some(_) => None,
            None => Some(source.load(stage, &handler.name)?),
        };
        catalog_sources.push(loaded);
    }

    let handler_names: Vec<String> = handlers.iter().map(|h| h.name.clone()).collect();
    let mut code = dispatcher_source(stage, &handler_names);

    for (handler, loaded) in handlers.iter().zip(catalog_sources) {
        let handler_code = match loaded {
            Some(raw) => apply_replacements(&raw, &handler.replacements),
            None => handler.code.clone().unwrap_or_default(),
        };

        code.push_str(&format!("\n\n// ----------- Handler: {} -----------\n", handler.name));
        code.push_str(&handler_code);
    }

    debug!(
        function = name,
        stage = %stage,
        catalog = source.name(),
        handlers = handler_names.len(),
        bytes = code.len(),
        "compiled edge function"
    );

    Ok(CompiledFunction::new(name, stage, code, handler_names))
}

/// Generate the dispatcher that runs the chain
fn dispatcher_source(stage: Stage, handler_names: &[String]) -> String {
    let field = stage.object_field();

    format!(
        r#"{declaration}{names}];

async function handler(event) {{
    let input = event.{field};
    for (let i = 0; i < handlerChain.length; i++) {{
        const handler = handlerChain[i];
        const processed = await handler(input);
        const outputEvent = processed.{field};
        if (processed.stop) {{
            return outputEvent;
        }} else {{
            input = outputEvent;
        }}
    }}
    return input;
}}"#,
        declaration = CHAIN_DECLARATION,
        names = handler_names.join(","),
        field = field,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[test]
    fn test_empty_chain_dispatcher() {
        let catalog = MemoryCatalog::new();
        let function = compile("empty", Stage::ViewerRequest, &[], &catalog).unwrap();

        assert!(function.code().starts_with("const handlerChain = [];\n"));
        assert!(function.code().contains("let input = event.request;"));
        assert!(function.code().ends_with("    return input;\n}"));
    }

    #[test]
    fn test_response_stage_uses_response_field() {
        let catalog = MemoryCatalog::new();
        let handler = Handler::with_code("h", "function h(response) { return {response}; }");
        let function = compile("f", Stage::ViewerResponse, &[handler], &catalog).unwrap();

        assert!(function.code().contains("let input = event.response;"));
        assert!(function.code().contains("const outputEvent = processed.response;"));
    }

    #[test]
    fn test_handler_sections_in_order() {
        let catalog = MemoryCatalog::new();
        catalog.insert(
            Stage::ViewerRequest,
            "second",
            "function second(request) { return {request}; }",
        );

        let handlers = [
            Handler::with_code("first", "function first(request) { return {request}; }"),
            Handler::builtin("second"),
        ];
        let function = compile("f", Stage::ViewerRequest, &handlers, &catalog).unwrap();
        let code = function.code();

        assert!(code.starts_with("const handlerChain = [first,second];"));
        let first = code.find("// ----------- Handler: first -----------\n").unwrap();
        let second = code.find("// ----------- Handler: second -----------\n").unwrap();
        assert!(first < second);
        let boundary = "    return input;\n}\n\n// ----------- Handler: first -----------\n";
        assert!(code.contains(boundary));
        assert!(code.ends_with("function second(request) { return {request}; }"));
    }

    #[test]
    fn test_literal_code_is_not_substituted() {
        let catalog = MemoryCatalog::new();
        let handler = Handler::with_code("h", "function h(request) { return '__X__'; }")
            .replace("__X__", "y");
        let function = compile("f", Stage::ViewerRequest, &[handler], &catalog).unwrap();

        assert!(function.code().contains("'__X__'"));
    }

    #[test]
    fn test_missing_handler_fails_before_assembly() {
        let catalog = MemoryCatalog::new();
        let handlers = [Handler::builtin("nope")];
        let err = compile("f", Stage::ViewerRequest, &handlers, &catalog).unwrap_err();

        match err {
            Error::HandlerNotFound { stage, name } => {
                assert_eq!(stage, "viewer-request");
                assert_eq!(name, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let catalog = MemoryCatalog::new();
        let handlers = [
            Handler::with_code("h", "function h(r) {}"),
            Handler::with_code("h", "function h(r) {}"),
        ];
        let err = compile("f", Stage::ViewerRequest, &handlers, &catalog).unwrap_err();
        assert!(matches!(err, Error::InvalidHandler(_)));
    }
}
