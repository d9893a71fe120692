//! iCalendar serializer (RFC 5545).
//!
//! Output is deterministic: properties follow a canonical order per
//! component kind, unknown properties sort by name, and children are
//! ordered by kind then UID. Serializing the same document twice
//! yields byte-identical text.

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ComponentKind, ICalendar, Parameter, Property, Value};

/// Serializes an iCalendar document to a string.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    serialize_component(&ical.root)
}

/// Serializes a component to a string.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut result = String::new();
    let name = component.kind.as_str();

    result.push_str(&fold_line(&format!("BEGIN:{name}")));

    for prop in canonical_property_order(&component.properties, component.kind) {
        result.push_str(&serialize_property(prop));
    }

    for child in canonical_component_order(&component.children) {
        result.push_str(&serialize_component(child));
    }

    result.push_str(&fold_line(&format!("END:{name}")));

    result
}

/// Serializes a single property to a folded content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();

    for param in &prop.params {
        line.push(';');
        line.push_str(&serialize_parameter(param));
    }

    line.push(':');

    match &prop.value {
        Value::Text(s) => line.push_str(&escape_text(s)),
        Value::Raw(s) => line.push_str(s),
    }

    fold_line(&line)
}

fn serialize_parameter(param: &Parameter) -> String {
    let values: Vec<String> = param.values.iter().map(|v| escape_param_value(v)).collect();
    format!("{}={}", param.name, values.join(","))
}

/// Returns properties in canonical order for deterministic output.
fn canonical_property_order(props: &[Property], kind: ComponentKind) -> Vec<&Property> {
    let order: &[&str] = match kind {
        ComponentKind::Calendar => &["VERSION", "PRODID", "CALSCALE", "METHOD"],
        ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal => &[
            "UID",
            "DTSTAMP",
            "DTSTART",
            "DTEND",
            "DUE",
            "DURATION",
            "RRULE",
            "SUMMARY",
            "DESCRIPTION",
            "LOCATION",
            "STATUS",
            "PRIORITY",
        ],
        ComponentKind::Unknown => &[],
    };

    let mut ordered: Vec<&Property> = Vec::with_capacity(props.len());

    for &name in order {
        for prop in props {
            if prop.name.eq_ignore_ascii_case(name) {
                ordered.push(prop);
            }
        }
    }

    // Remaining properties (extensions) sort by name so output stays
    // stable regardless of insertion order.
    let mut rest: Vec<&Property> = props
        .iter()
        .filter(|p| !order.iter().any(|&n| p.name.eq_ignore_ascii_case(n)))
        .collect();
    rest.sort_by(|a, b| a.name.cmp(&b.name));
    ordered.extend(rest);

    ordered
}

/// Returns child components ordered by kind, then UID.
fn canonical_component_order(children: &[Component]) -> Vec<&Component> {
    let mut events: Vec<&Component> = Vec::new();
    let mut todos: Vec<&Component> = Vec::new();
    let mut other: Vec<&Component> = Vec::new();

    for child in children {
        match child.kind {
            ComponentKind::Event => events.push(child),
            ComponentKind::Todo => todos.push(child),
            _ => other.push(child),
        }
    }

    events.sort_by_key(|c| c.uid().unwrap_or(""));
    todos.sort_by_key(|c| c.uid().unwrap_or(""));

    let mut result = Vec::with_capacity(children.len());
    result.extend(events);
    result.extend(todos);
    result.extend(other);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_simple_vevent() {
        let mut ical = ICalendar::new("-//Test//Test//EN");
        let mut event = Component::event();
        event.add_property(Property::text("UID", "test-uid-123"));
        event.add_property(Property::text("SUMMARY", "Test Event"));
        ical.add_event(event);

        let output = serialize(&ical);

        assert!(output.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(output.ends_with("END:VCALENDAR\r\n"));
        assert!(output.contains("VERSION:2.0\r\n"));
        assert!(output.contains("UID:test-uid-123\r\n"));
        assert!(output.contains("SUMMARY:Test Event\r\n"));
    }

    #[test]
    fn serialize_escapes_text() {
        let mut event = Component::event();
        event.add_property(Property::text("SUMMARY", "Meeting, important"));
        event.add_property(Property::text("DESCRIPTION", "Line 1\nLine 2"));

        let output = serialize_component(&event);

        assert!(output.contains("SUMMARY:Meeting\\, important\r\n"));
        assert!(output.contains("DESCRIPTION:Line 1\\nLine 2\r\n"));
    }

    #[test]
    fn serialize_raw_value_verbatim() {
        let mut event = Component::event();
        event.add_property(Property::raw("DTSTART", "20240115T100000Z"));

        let output = serialize_component(&event);
        assert!(output.contains("DTSTART:20240115T100000Z\r\n"));
    }

    #[test]
    fn serialize_folds_long_lines() {
        let mut event = Component::event();
        let long_summary = "A".repeat(100);
        event.add_property(Property::text("SUMMARY", &long_summary));

        let output = serialize_component(&event);

        assert!(output.contains("\r\n "));

        let unfolded = output.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{long_summary}\r\n")));
    }

    #[test]
    fn canonical_order_applied() {
        let mut event = Component::event();
        event.add_property(Property::text("SUMMARY", "Summary"));
        event.add_property(Property::text("UID", "uid"));
        event.add_property(Property::text("DESCRIPTION", "Desc"));

        let output = serialize_component(&event);

        let uid_pos = output.find("UID:").unwrap();
        let summary_pos = output.find("SUMMARY:").unwrap();
        assert!(uid_pos < summary_pos);
    }

    #[test]
    fn extension_properties_sorted_by_name() {
        let mut event = Component::event();
        event.add_property(Property::text("UID", "uid"));
        event.add_property(Property::text("X-ZEBRA", "z"));
        event.add_property(Property::text("X-ALPHA", "a"));

        let output = serialize_component(&event);

        let alpha_pos = output.find("X-ALPHA:").unwrap();
        let zebra_pos = output.find("X-ZEBRA:").unwrap();
        assert!(alpha_pos < zebra_pos);
    }

    #[test]
    fn events_sorted_by_uid() {
        let mut ical = ICalendar::default();
        for uid in ["charlie", "alpha", "bravo"] {
            let mut event = Component::event();
            event.add_property(Property::text("UID", uid));
            ical.add_event(event);
        }

        let output = serialize(&ical);
        let a = output.find("UID:alpha").unwrap();
        let b = output.find("UID:bravo").unwrap();
        let c = output.find("UID:charlie").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn serialize_is_deterministic() {
        let mut ical = ICalendar::default();
        let mut event = Component::event();
        event.add_property(Property::text("UID", "uid-1"));
        event.add_property(Property::text("X-B", "b"));
        event.add_property(Property::text("X-A", "a"));
        ical.add_event(event);

        assert_eq!(serialize(&ical), serialize(&ical));
    }
}
