//! JSON-to-iCalendar codec.
//!
//! Stored calendar documents are JSON objects with a small set of
//! recognized fields; everything else is carried through opaquely so
//! decode-then-encode preserves extension fields byte for byte.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rrule::{RRule, Unvalidated};
use sha2::{Digest, Sha256};
use sundial_rfc::rfc::ical::build::serialize;
use sundial_rfc::rfc::ical::core::{
    Component, ComponentKind, ICalendar, Property, format_utc_basic, parse_utc_timestamp,
};

use crate::error::CodecError;

/// Canonical in-memory form of one VEVENT or VTODO.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    /// Unique identifier.
    pub uid: String,
    /// Event summary.
    pub summary: Option<String>,
    /// Start timestamp.
    pub dtstart: Option<DateTime<Utc>>,
    /// End timestamp.
    pub dtend: Option<DateTime<Utc>>,
    /// Due timestamp (todos).
    pub due: Option<DateTime<Utc>>,
    /// Recurrence rule in RFC 5545 RRULE syntax.
    pub rrule: Option<String>,
    /// Unrecognized fields, keyed by uppercased property name.
    ///
    /// A `BTreeMap` keeps extension output name-ordered and therefore
    /// deterministic.
    pub extensions: BTreeMap<String, String>,
}

/// Decodes a stored document into a normalized event.
///
/// Recognized fields: `uid` (required), `summary`, `dtstart`, `dtend`,
/// `due`, `rrule`. Remaining fields become extensions: string values
/// are kept verbatim, anything else keeps its JSON rendering.
///
/// ## Errors
/// Returns [`CodecError::MalformedDocument`] if the document is not a
/// JSON object, `uid` is missing or empty, a recognized field has the
/// wrong type, a timestamp does not parse, the rrule is not valid
/// RRULE syntax, or two extension names collide after uppercasing.
pub fn decode(document: &serde_json::Value) -> Result<NormalizedEvent, CodecError> {
    let Some(fields) = document.as_object() else {
        return Err(CodecError::MalformedDocument(
            "document is not a JSON object".into(),
        ));
    };

    let uid = match fields.get("uid").and_then(serde_json::Value::as_str) {
        Some(uid) if !uid.is_empty() => uid.to_string(),
        _ => {
            return Err(CodecError::MalformedDocument(
                "missing or empty uid".into(),
            ));
        }
    };

    let summary = get_string(fields, "summary")?;
    let dtstart = get_timestamp(fields, "dtstart")?;
    let dtend = get_timestamp(fields, "dtend")?;
    let due = get_timestamp(fields, "due")?;

    let rrule = get_string(fields, "rrule")?;
    if let Some(ref raw) = rrule {
        raw.parse::<RRule<Unvalidated>>().map_err(|e| {
            CodecError::MalformedDocument(format!("invalid rrule {raw:?}: {e}"))
        })?;
    }

    const KNOWN_FIELDS: [&str; 6] = ["uid", "summary", "dtstart", "dtend", "due", "rrule"];
    let mut extensions = BTreeMap::new();
    for (name, value) in fields {
        if KNOWN_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let rendered = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        let key = name.to_ascii_uppercase();
        if extensions.contains_key(&key) {
            return Err(CodecError::MalformedDocument(format!(
                "extension fields collide on name {key}"
            )));
        }
        extensions.insert(key, rendered);
    }

    Ok(NormalizedEvent {
        uid,
        summary,
        dtstart,
        dtend,
        due,
        rrule,
        extensions,
    })
}

/// Encodes a normalized event as iCalendar text.
///
/// Produces a complete VCALENDAR wrapper with exactly one component of
/// the given kind. Output is deterministic; encoding the same event
/// twice yields byte-identical text.
#[must_use]
pub fn encode(event: &NormalizedEvent, kind: ComponentKind) -> String {
    let mut component = Component::new(kind);
    component.add_property(Property::text("UID", &event.uid));

    if let Some(dtstart) = event.dtstart {
        component.add_property(Property::raw("DTSTART", format_utc_basic(dtstart)));
    }
    if let Some(dtend) = event.dtend {
        component.add_property(Property::raw("DTEND", format_utc_basic(dtend)));
    }
    if let Some(due) = event.due {
        component.add_property(Property::raw("DUE", format_utc_basic(due)));
    }
    if let Some(ref rrule) = event.rrule {
        component.add_property(Property::raw("RRULE", rrule));
    }
    if let Some(ref summary) = event.summary {
        component.add_property(Property::text("SUMMARY", summary));
    }
    for (name, value) in &event.extensions {
        component.add_property(Property::raw(name, value));
    }

    let mut ical = ICalendar::default();
    ical.root.add_child(component);
    serialize(&ical)
}

/// Computes the entity tag for rendered iCalendar text.
///
/// SHA-256 over the text, hex-encoded, quoted. Stable across runs as
/// long as the text is identical.
#[must_use]
pub fn etag(ics: &str) -> String {
    let digest = Sha256::digest(ics.as_bytes());
    format!("\"{}\"", hex::encode(digest))
}

fn get_string(
    fields: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<String>, CodecError> {
    match fields.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CodecError::MalformedDocument(format!(
            "field {name} must be a string, got {other}"
        ))),
    }
}

fn get_timestamp(
    fields: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<DateTime<Utc>>, CodecError> {
    let Some(raw) = get_string(fields, name)? else {
        return Ok(None);
    };
    match parse_utc_timestamp(&raw) {
        Some(parsed) => Ok(Some(parsed)),
        None => Err(CodecError::MalformedDocument(format!(
            "field {name} has invalid timestamp {raw:?}"
        ))),
    }
}
