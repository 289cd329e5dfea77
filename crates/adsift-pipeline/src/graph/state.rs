use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use adsift_core::error::{AdsiftError, Result};

/// Field-keyed state of one pipeline run.
///
/// Starts from the caller's input and grows as steps complete. Fields are
/// only ever added or overwritten by the step that owns them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    data: HashMap<String, Value>,
}

impl PipelineState {
    /// Seed the state from a value that serializes to a JSON object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(obj) => Ok(Self {
                data: obj.into_iter().collect(),
            }),
            other => Err(AdsiftError::Config(format!(
                "pipeline input must be an object, got {}",
                other
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Copy of the fields named in `keys`. Absent fields are left out.
    pub fn snapshot(&self, keys: &[String]) -> Map<String, Value> {
        keys.iter()
            .filter_map(|k| self.data.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Write a step's output fields into the state (overwrites on conflict).
    pub fn apply(&mut self, output: Map<String, Value>) {
        for (k, v) in output {
            self.data.insert(k, v);
        }
    }
}
