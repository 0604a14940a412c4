//! Value encoding decisions for multi-valued and structured leaves.
//!
//! A flattened leaf is supplied as a single string token; this module
//! decides, per field and per [`ArrayPolicy`], how that token decodes back
//! into a structured value.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::introspect::BaseType;

/// Errors raised by parse functions.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed JSON passed to a JSON-blob parser. Propagates from the
    /// decoder, never reinterpreted.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Failure raised by a caller-supplied parse function.
    #[error("{0}")]
    Custom(String),
}

/// Result alias for parse functions.
pub type ParseResult = Result<Value, ParseError>;

/// A cloneable string-to-value parse function.
#[derive(Clone)]
pub struct ParseFn(Arc<dyn Fn(&str) -> ParseResult + Send + Sync>);

impl ParseFn {
    /// Wraps a closure as a parse function.
    pub fn new(f: impl Fn(&str) -> ParseResult + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Comma-split-and-trim parsing: `"a, b, c"` → `["a", "b", "c"]`.
    pub fn comma_split() -> Self {
        Self::new(|raw| {
            Ok(Value::Array(
                raw.split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            ))
        })
    }

    /// JSON-blob parsing via [`serde_json`].
    pub fn json_blob() -> Self {
        Self::new(|raw| Ok(serde_json::from_str(raw)?))
    }

    /// Invokes the parse function.
    pub fn call(&self, raw: &str) -> ParseResult {
        (self.0)(raw)
    }
}

impl fmt::Debug for ParseFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParseFn(..)")
    }
}

/// How array-typed leaves are encoded as command-line tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayPolicy {
    /// Comma-split primitive elements; object elements become repeated
    /// JSON occurrences.
    #[default]
    Repeated,
    /// The raw token is always parsed as one JSON value.
    Json,
}

/// Codec decision for one leaf field.
#[derive(Debug, Clone)]
pub struct ValueEncoding {
    /// True when the consuming CLI layer should accept the flag multiple
    /// times rather than once (array of object elements under `Repeated`).
    pub multi_value_repeat: bool,
    /// Parse function matching the encoding.
    pub parse: ParseFn,
}

/// Decides the encoding for a leaf, in priority order:
///
/// 1. non-array, non-object leaves always comma-split regardless of policy;
/// 2. policy [`Json`](ArrayPolicy::Json) parses the raw string as JSON;
/// 3. [`Repeated`](ArrayPolicy::Repeated) arrays of primitives comma-split;
/// 4. [`Repeated`](ArrayPolicy::Repeated) arrays of object elements parse
///    each occurrence as JSON and set `multi_value_repeat`.
///
/// Plain object leaves parse as a single JSON blob regardless of policy.
pub fn decide(base_type: BaseType, element_is_object: bool, policy: ArrayPolicy) -> ValueEncoding {
    match base_type {
        BaseType::Array => match policy {
            ArrayPolicy::Json => ValueEncoding {
                multi_value_repeat: false,
                parse: ParseFn::json_blob(),
            },
            ArrayPolicy::Repeated if element_is_object => ValueEncoding {
                multi_value_repeat: true,
                parse: ParseFn::json_blob(),
            },
            ArrayPolicy::Repeated => ValueEncoding {
                multi_value_repeat: false,
                parse: ParseFn::comma_split(),
            },
        },
        BaseType::Object => ValueEncoding {
            multi_value_repeat: false,
            parse: ParseFn::json_blob(),
        },
        _ => ValueEncoding {
            multi_value_repeat: false,
            parse: ParseFn::comma_split(),
        },
    }
}
