//! Test doubles and common utilities for contract tests
//!
//! Provides a catalog that counts lookups, an embedded JavaScript engine that
//! runs compiled functions, and Rust stand-ins for the built-in handlers.

#![allow(dead_code)]

use boa_engine::{Context, Source};
use infrakit_core::catalog::MemoryCatalog;
use infrakit_core::edge::{CompiledFunction, Handler, Stage};
use infrakit_core::error::Result;
use infrakit_core::traits::HandlerSource;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A catalog that records how often it was consulted
#[derive(Clone, Default)]
pub struct CountingCatalog {
    inner: MemoryCatalog,
    loads: Arc<AtomicUsize>,
}

impl CountingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler returning `{<field>}` unchanged
    pub fn with_passthrough(self, stage: Stage, name: &str) -> Self {
        let field = stage.object_field();
        self.inner.insert(
            stage,
            name,
            format!("function {name}({field}) {{\n    return {{ {field} }};\n}}\n"),
        );
        self
    }

    /// Add a handler with explicit source
    pub fn with_source(self, stage: Stage, name: &str, code: &str) -> Self {
        self.inner.insert(stage, name, code);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl HandlerSource for CountingCatalog {
    fn load(&self, stage: Stage, name: &str) -> Result<String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(stage, name)
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Run the generated code of a compiled function
///
/// Wraps `input` into the stage's event (`{request}` or `{response}`), calls
/// the generated `handler(event)` and returns the settled value.
pub fn execute(function: &CompiledFunction, input: Value) -> Value {
    let mut event = serde_json::Map::new();
    event.insert(function.stage().object_field().to_string(), input);

    let script = format!(
        "{code}\n\nvar outcome = {{}};\n\
         handler({event}).then(\n\
         \x20   function (value) {{\n\
         \x20       outcome = {{ value: value === undefined ? null : value }};\n\
         \x20   }},\n\
         \x20   function (error) {{ outcome = {{ error: String(error) }}; }}\n\
         );\n",
        code = function.code(),
        event = Value::Object(event),
    );

    let mut context = Context::default();
    if let Err(e) = context.eval(Source::from_bytes(&script)) {
        panic!("generated code of '{}' failed: {e}\n{script}", function.name());
    }
    context.run_jobs();

    let outcome = context
        .eval(Source::from_bytes("JSON.stringify(outcome)"))
        .expect("outcome serializes");
    let text = outcome
        .as_string()
        .expect("JSON.stringify returns a string")
        .to_std_string_escaped();
    let outcome: Value = serde_json::from_str(&text).unwrap();

    if let Some(error) = outcome.get("error") {
        panic!("handler({}) rejected: {error}", function.name());
    }
    outcome
        .get("value")
        .cloned()
        .unwrap_or_else(|| panic!("handler({}) never settled", function.name()))
}

/// Literal handler appending its name to the `x-trail` request header
pub fn trail_handler(name: &str) -> Handler {
    Handler::with_code(
        name,
        format!(
            "function {name}(request) {{\n\
             \x20   const trail = request.headers['x-trail'];\n\
             \x20   const prefix = trail === undefined ? '' : trail.value + ',';\n\
             \x20   request.headers['x-trail'] = {{ value: prefix + '{name}' }};\n\
             \x20   return {{ request }};\n\
             }}\n"
        ),
    )
}

/// Records handler invocations during a simulation
#[derive(Default)]
pub struct InvocationLog {
    pub calls: Vec<String>,
}

impl InvocationLog {
    pub fn record(&mut self, name: &str) {
        self.calls.push(name.to_string());
    }
}

/// Viewer request with the given URI and no headers
pub fn request(uri: &str) -> Value {
    json!({ "uri": uri, "headers": {} })
}

/// Viewer request carrying an authorization header
pub fn request_with_auth(uri: &str, authorization: &str) -> Value {
    json!({ "uri": uri, "headers": { "authorization": { "value": authorization } } })
}

/// Viewer response with no headers
pub fn response() -> Value {
    json!({ "statusCode": 200, "headers": {} })
}

/// Rust stand-in for `indexRewriteHandler`
pub fn index_rewrite(mut request: Value) -> Value {
    let uri = request["uri"].as_str().unwrap_or_default().to_string();
    let rewritten = if uri.ends_with('/') {
        format!("{uri}index.html")
    } else if !uri.contains('.') {
        format!("{uri}/index.html")
    } else {
        uri
    };
    request["uri"] = Value::String(rewritten);
    json!({ "request": request })
}

/// Rust stand-in for `basicAuthHandler` with the expected header value
pub fn basic_auth(request: Value, expected: &str) -> Value {
    let header = request["headers"]["authorization"]["value"].as_str();
    if header == Some(expected) {
        json!({ "request": request })
    } else {
        json!({
            "request": {
                "statusCode": 401,
                "statusDescription": "Unauthorized",
                "headers": {
                    "www-authenticate": {
                        "value": "Basic realm=\"Restricted\", charset=\"UTF-8\""
                    }
                }
            },
            "stop": true
        })
    }
}

/// Rust stand-in for `securityHeadersHandler`
pub fn security_headers(mut response: Value) -> Value {
    let headers = &mut response["headers"];
    headers["strict-transport-security"] =
        json!({ "value": "max-age=63072000; includeSubdomains; preload" });
    headers["x-content-type-options"] = json!({ "value": "nosniff" });
    headers["x-frame-options"] = json!({ "value": "DENY" });
    headers["referrer-policy"] = json!({ "value": "same-origin" });
    json!({ "response": response })
}

/// Rust stand-in for `cacheControlHandler`
pub fn cache_control(mut response: Value, immutable: bool) -> Value {
    let value = if immutable {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    };
    response["headers"]["cache-control"] = json!({ "value": value });
    json!({ "response": response })
}
