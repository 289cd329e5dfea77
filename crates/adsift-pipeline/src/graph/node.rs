use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use adsift_core::error::{AdsiftError, Result};

/// A processing step with a typed input and output contract.
///
/// Steps never see the pipeline state directly: they receive their own input
/// record and return a fresh output record.
pub trait Step: Send + Sync + 'static {
    type Input: DeserializeOwned + Send + 'static;
    type Output: Serialize + Send + 'static;

    fn run(&self, input: Self::Input) -> BoxFuture<'_, Result<Self::Output>>;
}

/// Object-safe view of a `Step` working on JSON objects.
trait ErasedStep: Send + Sync {
    fn call<'a>(&'a self, node_id: &'a str, input: Map<String, Value>)
        -> BoxFuture<'a, Result<Value>>;
}

impl<S: Step> ErasedStep for S {
    fn call<'a>(
        &'a self,
        node_id: &'a str,
        input: Map<String, Value>,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let typed: S::Input =
                serde_json::from_value(Value::Object(input)).map_err(|e| AdsiftError::Contract {
                    step: node_id.to_string(),
                    message: format!("input does not match contract: {}", e),
                })?;
            let output = self.run(typed).await?;
            serde_json::to_value(output).map_err(|e| AdsiftError::Contract {
                step: node_id.to_string(),
                message: format!("output could not be serialized: {}", e),
            })
        })
    }
}

/// A node in the execution graph.
///
/// Wraps a step together with the state fields it reads (`input_keys`) and
/// the fields it owns (`output_keys`).
#[derive(Clone)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Keys pulled from the pipeline state as input.
    pub input_keys: Vec<String>,
    /// Keys this node writes into the pipeline state.
    pub output_keys: Vec<String>,
    step: Arc<dyn ErasedStep>,
}

impl Node {
    pub fn new<S: Step>(id: impl Into<String>, name: impl Into<String>, step: S) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input_keys: vec![],
            output_keys: vec![],
            step: Arc::new(step),
        }
    }

    /// Set the input keys.
    pub fn with_inputs(mut self, keys: &[&str]) -> Self {
        self.input_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Set the output keys.
    pub fn with_outputs(mut self, keys: &[&str]) -> Self {
        self.output_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Run the step on a snapshot of its input fields.
    ///
    /// The returned map holds exactly the declared output keys.
    pub async fn invoke(&self, snapshot: Map<String, Value>) -> Result<Map<String, Value>> {
        let output = self.step.call(&self.id, snapshot).await?;
        let Value::Object(fields) = output else {
            return Err(self.contract_error("output is not a record"));
        };

        if let Some(extra) = fields.keys().find(|k| !self.output_keys.contains(k)) {
            return Err(self.contract_error(format!("undeclared output field '{}'", extra)));
        }
        if let Some(missing) = self.output_keys.iter().find(|k| !fields.contains_key(*k)) {
            return Err(self.contract_error(format!("declared output field '{}' missing", missing)));
        }
        Ok(fields)
    }

    fn contract_error(&self, message: impl Into<String>) -> AdsiftError {
        AdsiftError::Contract {
            step: self.id.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("input_keys", &self.input_keys)
            .field("output_keys", &self.output_keys)
            .finish()
    }
}
