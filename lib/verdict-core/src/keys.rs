//! Object key naming strategies applied before deserialization.
//!
//! Servers disagree on how they spell field names. [`KeyDecoding`] rewrites
//! every object key of an incoming JSON document so it matches the names the
//! target type expects.
//!
//! # Example
//!
//! ```
//! use verdict_core::KeyDecoding;
//!
//! assert_eq!(KeyDecoding::ConvertFromSnakeCase.convert("user_name"), "userName");
//! assert_eq!(KeyDecoding::ConvertFromCamelCase.convert("userName"), "user_name");
//! assert_eq!(KeyDecoding::UseDefaultKeys.convert("user_name"), "user_name");
//! ```

use serde_json::{Map, Value};

use crate::DecodeFailure;

/// How wire keys map onto field names.
#[derive(Debug, Clone, Copy, Default)]
pub enum KeyDecoding {
    /// Keys are used exactly as received.
    ///
    /// Snake-case wire keys land directly on Rust's snake-case fields.
    #[default]
    UseDefaultKeys,

    /// `user_name` becomes `userName`.
    ///
    /// Leading and trailing underscores are kept; runs of underscores inside
    /// the key collapse. A key with several words has its first word
    /// lowercased (`User_Name` becomes `userName`); a single-word key is left
    /// as received.
    ConvertFromSnakeCase,

    /// `userName` becomes `user_name`.
    ConvertFromCamelCase,

    /// Caller-supplied conversion.
    Custom(fn(&str) -> String),
}

impl KeyDecoding {
    /// Returns `true` if keys are rewritten at all.
    #[must_use]
    pub const fn rewrites_keys(&self) -> bool {
        !matches!(self, Self::UseDefaultKeys)
    }

    /// Convert a single key.
    #[must_use]
    pub fn convert(&self, key: &str) -> String {
        match self {
            Self::UseDefaultKeys => key.to_string(),
            Self::ConvertFromSnakeCase => snake_to_camel(key),
            Self::ConvertFromCamelCase => camel_to_snake(key),
            Self::Custom(convert) => convert(key),
        }
    }

    /// Rewrite every object key in the document, at any depth.
    ///
    /// Fails when two keys of the same object convert to the same name
    /// (`user_name` and `userName` under [`Self::ConvertFromSnakeCase`]).
    pub fn apply(&self, value: Value) -> Result<Value, DecodeFailure> {
        if !self.rewrites_keys() {
            return Ok(value);
        }

        match value {
            Value::Object(map) => {
                let mut converted = Map::new();
                for (key, value) in map {
                    let name = self.convert(&key);
                    if converted.contains_key(&name) {
                        return Err(DecodeFailure::custom(format!(
                            "key `{key}` decodes to `{name}`, which is already present"
                        )));
                    }
                    converted.insert(name, self.apply(value)?);
                }
                Ok(Value::Object(converted))
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.apply(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }
}

fn snake_to_camel(key: &str) -> String {
    let trimmed = key.trim_matches('_');
    if trimmed.is_empty() {
        return key.to_string();
    }

    let leading = key.len() - key.trim_start_matches('_').len();
    let trailing = key.len() - key.trim_end_matches('_').len();

    let mut words = trimmed.split('_').filter(|word| !word.is_empty()).peekable();
    let mut out = String::with_capacity(key.len());
    out.push_str(&"_".repeat(leading));
    if let Some(first) = words.next() {
        if words.peek().is_some() {
            out.push_str(&first.to_lowercase());
        } else {
            out.push_str(first);
        }
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(&"_".repeat(trailing));
    out
}

fn camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            let after_word = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let ends_acronym = prev.is_some_and(|p| p.is_uppercase())
                && next.is_some_and(|n| n.is_lowercase());
            if (after_word || ends_acronym) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
