//! Builder for the `{function, params}` request body

use error_stack::Report;
use serde_json::{Map, Value};

use crate::constants::{FIELD_FUNCTION, FIELD_PARAMS};
use crate::error::{Error, Result};

/// Request body sent to the proxy
#[derive(Debug, Clone, PartialEq)]
pub struct CallEnvelope {
    function: String,
    params:   Map<String, Value>,
}

impl CallEnvelope {
    /// Start an envelope for `function` with empty params
    ///
    /// # Errors
    /// Fails with `InvalidArgument` when the function name is empty.
    pub fn new(function: &str) -> Result<Self> {
        if function.trim().is_empty() {
            return Err(Report::new(Error::missing("function name")));
        }
        Ok(Self {
            function: function.to_string(),
            params:   Map::new(),
        })
    }

    /// Set the parameter object; `null` stands for no parameters
    ///
    /// # Errors
    /// Fails with `InvalidArgument` for arrays and scalars.
    pub fn params(mut self, params: Value) -> Result<Self> {
        self.params = match params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(Report::new(Error::invalid(
                    "params",
                    format!("expected a JSON object, got {other}"),
                ))
                .attach(format!("Function: {}", self.function)));
            },
        };
        Ok(self)
    }

    /// Remote function name
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// JSON body, keys in `function`, `params` order
    #[must_use]
    pub fn build(&self) -> Value {
        let mut body = Map::new();
        body.insert(FIELD_FUNCTION.to_string(), Value::String(self.function.clone()));
        body.insert(FIELD_PARAMS.to_string(), Value::Object(self.params.clone()));
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_body_layout() {
        let envelope = CallEnvelope::new("get_farms")
            .unwrap()
            .params(json!({}))
            .unwrap();
        assert_eq!(
            envelope.build().to_string(),
            r#"{"function":"get_farms","params":{}}"#
        );
    }

    #[test]
    fn test_params_pass_through_verbatim() {
        let params = json!({"p_name": "Ana", "p_role": null, "p_ids": "[\"a\",\"b\"]"});
        let envelope = CallEnvelope::new("create_worker_simple")
            .unwrap()
            .params(params.clone())
            .unwrap();
        assert_eq!(envelope.build()["params"], params);
    }

    #[test]
    fn test_null_params_become_empty_object() {
        let envelope = CallEnvelope::new("get_farms").unwrap().params(Value::Null).unwrap();
        assert_eq!(envelope.build()["params"], json!({}));
    }

    #[test]
    fn test_rejects_empty_function_and_non_object_params() {
        let err = CallEnvelope::new("  ").unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidArgument(_)));

        let err = CallEnvelope::new("get_farms")
            .unwrap()
            .params(json!([1, 2]))
            .unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidArgument(_)));
    }
}
