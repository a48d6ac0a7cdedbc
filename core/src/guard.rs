//! Input guard for text transformations.
//!
//! # Design
//! `Guarded<F>` wraps any transformation `Fn(&str, A) -> Result<R, TextError>`
//! and checks the first argument before calling it: an absent value
//! short-circuits to `Ok(None)`, a non-text value fails with
//! `TextError::Type`, and text is handed through together with the remaining
//! arguments `A`. The name and doc string travel with the wrapper so tooling
//! can still describe the transformation it guards.

use std::any::type_name;

use crate::error::TextError;

/// First argument of a guarded transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextValue<'a> {
    /// No input at all. Distinct from the empty string.
    Absent,
    Text(&'a str),
    /// A present value of some other type, identified by name.
    Other(&'static str),
}

impl<'a> TextValue<'a> {
    /// A non-text value of type `T`.
    pub fn other<T: ?Sized>() -> Self {
        TextValue::Other(type_name::<T>())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TextValue::Absent)
    }
}

impl<'a> From<&'a str> for TextValue<'a> {
    fn from(text: &'a str) -> Self {
        TextValue::Text(text)
    }
}

impl<'a> From<&'a String> for TextValue<'a> {
    fn from(text: &'a String) -> Self {
        TextValue::Text(text.as_str())
    }
}

impl<'a> From<Option<&'a str>> for TextValue<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(TextValue::Absent, TextValue::Text)
    }
}

impl<'a> From<Option<&'a String>> for TextValue<'a> {
    fn from(text: Option<&'a String>) -> Self {
        text.map_or(TextValue::Absent, |t| TextValue::Text(t.as_str()))
    }
}

/// JSON `null` is absent; strings are text; everything else is rejected by
/// the guard under its JSON type name.
impl<'a> From<&'a serde_json::Value> for TextValue<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => TextValue::Absent,
            Value::String(text) => TextValue::Text(text.as_str()),
            Value::Bool(_) => TextValue::Other("bool"),
            Value::Number(_) => TextValue::Other("number"),
            Value::Array(_) => TextValue::Other("array"),
            Value::Object(_) => TextValue::Other("object"),
        }
    }
}

/// A transformation behind the text-or-absent check.
#[derive(Debug, Clone, Copy)]
pub struct Guarded<F> {
    name: &'static str,
    doc: &'static str,
    inner: F,
}

/// Wrap `inner` so its first argument must be text or absent.
pub const fn guard<F>(name: &'static str, doc: &'static str, inner: F) -> Guarded<F> {
    Guarded { name, doc, inner }
}

impl<F> Guarded<F> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    /// Run the guarded transformation.
    ///
    /// Returns `Ok(None)` for an absent value without calling the wrapped
    /// transformation.
    pub fn call<'a, A, R>(
        &self,
        value: impl Into<TextValue<'a>>,
        args: A,
    ) -> Result<Option<R>, TextError>
    where
        F: Fn(&str, A) -> Result<R, TextError>,
    {
        match value.into() {
            TextValue::Absent => Ok(None),
            TextValue::Other(received) => Err(TextError::Type { received }),
            TextValue::Text(text) => (self.inner)(text, args).map(Some),
        }
    }
}
