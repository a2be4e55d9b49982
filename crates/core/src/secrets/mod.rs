//! Secret resolution.
//!
//! A [`SecretStore`] returns the raw secret string stored under a name;
//! [`fetch_secret`] turns it into a [`SecretBundle`] of string fields.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use log::{debug, error};
use serde_json::Value;

use crate::errors::{Error, Result};

/// Read-only access to named secrets.
///
/// Implementations map backend failures (permission denied, transient
/// faults) to [`Error::SecretAccess`] and return `Ok(None)` when no secret
/// exists under `name`.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;
}

/// Key-value credential bundle fetched from a [`SecretStore`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    name: String,
    values: HashMap<String, String>,
}

impl SecretBundle {
    /// Parse a secret payload that must be a flat JSON object.
    ///
    /// Every value must be a JSON string; numbers, booleans, nulls, arrays
    /// and nested objects are rejected.
    pub fn parse(name: &str, raw: &str) -> Result<Self> {
        let format_error = |message: String| Error::SecretFormat {
            name: name.to_string(),
            message,
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| format_error(e.to_string()))?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(format_error(format!(
                    "expected a JSON object, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut values = HashMap::with_capacity(object.len());
        for (field, value) in object {
            let text = match value {
                Value::String(s) => s,
                other => {
                    return Err(format_error(format!(
                        "field '{}' holds {}, expected a string",
                        field,
                        json_type_name(&other)
                    )))
                }
            };
            values.insert(field, text);
        }

        Ok(Self {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing field is a configuration error.
    pub fn require(&self, field: &str) -> Result<&str> {
        self.get(field).ok_or_else(|| {
            Error::Config(format!(
                "secret '{}' has no field '{}'",
                self.name, field
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Never print secret values.
impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.values.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("SecretBundle")
            .field("name", &self.name)
            .field("fields", &fields)
            .finish()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fetch and parse the secret stored under `name`.
pub async fn fetch_secret(store: &dyn SecretStore, name: &str) -> Result<SecretBundle> {
    debug!("Fetching secret '{}'", name);

    let raw = match store.get_secret(name).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            let err = Error::SecretAccess {
                name: name.to_string(),
                message: "secret not found".to_string(),
            };
            error!("Error fetching secret: {}", err);
            return Err(err);
        }
        Err(e) => {
            error!("Error fetching secret: {}", e);
            return Err(e);
        }
    };

    SecretBundle::parse(name, &raw).inspect_err(|e| error!("Error parsing secret: {}", e))
}
