//! Compiled edge functions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::compiler::CHAIN_DECLARATION;
use super::stage::Stage;
use crate::error::{Error, Result};

/// Runtime the generated code targets
pub const EDGE_RUNTIME: &str = "cloudfront-js-2.0";

/// Output of a handler chain compilation
///
/// An opaque source blob plus the stage it is attached to. Deployment is
/// left to the infrastructure engine consuming this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledFunction {
    name: String,
    stage: Stage,
    runtime: String,
    code: String,
    handler_names: Vec<String>,
}

impl CompiledFunction {
    pub(crate) fn new(
        name: impl Into<String>,
        stage: Stage,
        code: String,
        handler_names: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            stage,
            runtime: EDGE_RUNTIME.to_string(),
            code,
            handler_names,
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage the function is attached to
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Target runtime identifier
    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Generated source
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Handler names in chain order
    pub fn handler_names(&self) -> &[String] {
        &self.handler_names
    }

    /// Deployment comment: the comma-separated handler names
    pub fn comment(&self) -> String {
        self.handler_names.join(",")
    }

    /// Handler order as declared in the generated code
    pub fn declared_chain(&self) -> Result<Vec<String>> {
        let declaration = self
            .code
            .lines()
            .find_map(|line| line.strip_prefix(CHAIN_DECLARATION))
            .and_then(|rest| rest.strip_suffix("];"))
            .ok_or_else(|| Error::Other(format!("{}: no handlerChain declaration", self.name)))?;

        Ok(declaration
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Run the dispatcher logic over JSON values
    ///
    /// Walks the chain declared in the generated code. `invoke(name, input)`
    /// stands in for the handler and returns its result object, e.g.
    /// `{"request": {...}, "stop": true}`. The stage field becomes the next
    /// input; a truthy `stop` returns it immediately. An empty chain returns
    /// the input unchanged.
    pub fn simulate<F>(&self, input: Value, mut invoke: F) -> Result<Value>
    where
        F: FnMut(&str, Value) -> Value,
    {
        let field = self.stage.object_field();
        let mut current = input;

        for name in self.declared_chain()? {
            let processed = invoke(&name, current);
            let output = processed.get(field).cloned().unwrap_or(Value::Null);

            if is_truthy(processed.get("stop")) {
                return Ok(output);
            }
            current = output;
        }

        Ok(current)
    }
}

/// JavaScript truthiness of an optional JSON value
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
