//! Argument Extraction
//!
//! Typed accessors over a planner-supplied argument map. Every accessor
//! reports the tool and argument name on failure so the error is usable as
//! a per-action message.

use serde_json::Value;
use thiserror::Error;

use plan_relay_core::Args;

/// Why an action could not be turned into a provider-native call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The provider has no tool by that name
    #[error("unsupported tool '{tool}'")]
    Unsupported { tool: String },

    /// A required argument is absent or null
    #[error("{tool} requires '{argument}'")]
    MissingArgument { tool: String, argument: String },

    /// An argument is present but has the wrong type
    #[error("{tool}: '{argument}' must be {expected}")]
    InvalidArgument {
        tool: String,
        argument: String,
        expected: &'static str,
    },

    /// None of a set of alternative arguments was supplied
    #[error("{tool} requires one of: {alternatives}")]
    MissingAlternative {
        tool: String,
        alternatives: &'static str,
    },
}

/// Result type alias for decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Borrowing reader over one action's arguments.
pub struct ArgReader<'a> {
    tool: &'a str,
    args: &'a Args,
}

impl<'a> ArgReader<'a> {
    pub fn new(tool: &'a str, args: &'a Args) -> Self {
        Self { tool, args }
    }

    pub fn args(&self) -> &'a Args {
        self.args
    }

    /// Present and non-null
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.args.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str) -> DecodeError {
        DecodeError::MissingArgument {
            tool: self.tool.to_string(),
            argument: key.to_string(),
        }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> DecodeError {
        DecodeError::InvalidArgument {
            tool: self.tool.to_string(),
            argument: key.to_string(),
            expected,
        }
    }

    pub fn missing_alternative(&self, alternatives: &'static str) -> DecodeError {
        DecodeError::MissingAlternative {
            tool: self.tool.to_string(),
            alternatives,
        }
    }

    pub fn required_str(&self, key: &str) -> DecodeResult<String> {
        self.optional_str(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional_str(&self, key: &str) -> DecodeResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    /// Empty strings count as absent
    pub fn non_empty_str(&self, key: &str) -> DecodeResult<Option<String>> {
        Ok(self.optional_str(key)?.filter(|s| !s.is_empty()))
    }

    pub fn str_or(&self, key: &str, default: &str) -> DecodeResult<String> {
        Ok(self
            .optional_str(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Integers may arrive as numbers or numeric strings.
    pub fn int_or(&self, key: &str, default: i64) -> DecodeResult<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| self.invalid(key, "an integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.invalid(key, "an integer")),
            Some(_) => Err(self.invalid(key, "an integer")),
        }
    }

    pub fn optional_f64(&self, key: &str) -> DecodeResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.invalid(key, "a number")),
            Some(_) => Err(self.invalid(key, "a number")),
        }
    }

    pub fn f64_or(&self, key: &str, default: f64) -> DecodeResult<f64> {
        Ok(self.optional_f64(key)?.unwrap_or(default))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> DecodeResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(key, "a boolean")),
        }
    }

    /// Missing or null yields an empty list.
    pub fn string_list(&self, key: &str) -> DecodeResult<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(key, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "a list of strings")),
        }
    }

    pub fn required_string_list(&self, key: &str) -> DecodeResult<Vec<String>> {
        if self.get(key).is_none() {
            return Err(self.missing(key));
        }
        self.string_list(key)
    }

    /// Arbitrary JSON payload that must be present.
    pub fn required_value(&self, key: &str) -> DecodeResult<Value> {
        self.get(key).cloned().ok_or_else(|| self.missing(key))
    }
}
