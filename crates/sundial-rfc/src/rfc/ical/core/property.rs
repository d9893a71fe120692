//! iCalendar property types (RFC 5545 §3.1, §3.8).

use super::Parameter;

/// A fully formed iCalendar property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Property value.
    pub value: Value,
}

impl Property {
    /// Creates a property with a text value.
    ///
    /// The value is escaped at serialization time.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Text(value.into()),
        }
    }

    /// Creates a property with a raw value.
    ///
    /// The value is emitted verbatim (datetimes, recurrence rules, and
    /// other non-TEXT values already in their wire form).
    #[must_use]
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Raw(value.into()),
        }
    }

    /// Adds a parameter to this property.
    pub fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    /// Returns the value as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Value::Text(s) | Value::Raw(s) => Some(s),
        }
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// TEXT value, escaped at serialization time.
    Text(String),
    /// Pre-formatted value emitted verbatim.
    Raw(String),
}
