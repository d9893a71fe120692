//! DAV property types.

use super::namespace::QName;

/// A DAV property with name and optional value.
///
/// A property with no value renders as an empty element; responses use
/// that form in the 404 propstat group for unresolved properties.
#[derive(Debug, Clone, PartialEq)]
pub struct DavProperty {
    /// The property name.
    pub name: QName,
    /// The property value (if resolved).
    pub value: Option<PropertyValue>,
}

impl DavProperty {
    /// Creates a property with no value (for 404 responses).
    #[must_use]
    pub fn not_found(name: QName) -> Self {
        Self { name, value: None }
    }

    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Text(value.into())),
        }
    }

    /// Creates a property carrying calendar data.
    #[must_use]
    pub fn content_data(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(PropertyValue::ContentData(value.into())),
        }
    }

    /// Creates an empty property.
    #[must_use]
    pub fn empty(name: QName) -> Self {
        Self {
            name,
            value: Some(PropertyValue::Empty),
        }
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Empty element.
    Empty,
    /// Text content.
    Text(String),
    /// Calendar data (large text).
    ContentData(String),
}

impl PropertyValue {
    /// Returns the value as text if applicable.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::ContentData(s) => Some(s),
            Self::Empty => None,
        }
    }
}
