//! Argument extraction shared by the tool implementations.
//!
//! Missing optional arguments fall back to defaults; present-but-malformed
//! arguments are rejected with [`ToolError::InvalidArguments`] before any
//! network call happens.

use mynah_core::error::ToolError;
use mynah_core::types::ResponseFormat;
use serde_json::Value;

pub(crate) fn invalid_args(tool: &str, reason: impl Into<String>) -> ToolError {
    ToolError::InvalidArguments {
        name: tool.to_string(),
        reason: reason.into(),
    }
}

/// Optional string argument.
pub(crate) fn optional_str<'a>(
    args: &'a Value,
    key: &str,
    tool: &str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid_args(tool, format!("'{key}' must be a string"))),
    }
}

/// Required string argument.
pub(crate) fn required_str<'a>(
    args: &'a Value,
    key: &str,
    tool: &str,
) -> Result<&'a str, ToolError> {
    optional_str(args, key, tool)?
        .ok_or_else(|| invalid_args(tool, format!("missing '{key}' parameter")))
}

/// Required unsigned integer argument.
pub(crate) fn required_u64(args: &Value, key: &str, tool: &str) -> Result<u64, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Err(invalid_args(tool, format!("missing '{key}' parameter"))),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| invalid_args(tool, format!("'{key}' must be a non-negative integer"))),
    }
}

/// Optional boolean argument, defaulting to false.
pub(crate) fn optional_bool(args: &Value, key: &str, tool: &str) -> Result<bool, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid_args(tool, format!("'{key}' must be a boolean"))),
    }
}

/// Optional array-of-strings argument, defaulting to empty.
pub(crate) fn string_array(args: &Value, key: &str, tool: &str) -> Result<Vec<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    invalid_args(tool, format!("'{key}' must be an array of strings"))
                })
            })
            .collect(),
        Some(_) => Err(invalid_args(
            tool,
            format!("'{key}' must be an array of strings"),
        )),
    }
}

/// `response_format` argument, defaulting to markdown.
pub(crate) fn response_format(args: &Value, tool: &str) -> Result<ResponseFormat, ToolError> {
    match optional_str(args, "response_format", tool)? {
        None => Ok(ResponseFormat::Markdown),
        Some(s) => ResponseFormat::parse(s).ok_or_else(|| {
            invalid_args(
                tool,
                format!("'response_format' must be \"markdown\" or \"json\", got \"{s}\""),
            )
        }),
    }
}

/// Integer argument bounded to `min..=max`, with a default when absent.
pub(crate) fn bounded_limit(
    args: &Value,
    key: &str,
    min: u64,
    max: u64,
    default: u64,
    tool: &str,
) -> Result<usize, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default as usize),
        Some(value) => {
            let n = value
                .as_u64()
                .ok_or_else(|| invalid_args(tool, format!("'{key}' must be an integer")))?;
            if !(min..=max).contains(&n) {
                return Err(invalid_args(
                    tool,
                    format!("'{key}' must be between {min} and {max}"),
                ));
            }
            Ok(n as usize)
        }
    }
}
