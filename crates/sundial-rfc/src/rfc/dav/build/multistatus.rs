//! Multistatus XML serialization.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::rfc::dav::core::{DavProperty, Multistatus, PropertyValue, PropstatResponse};

/// Serializes a multistatus response to XML.
///
/// Responses are written in the order they were added, so callers
/// control output determinism by ordering their responses.
///
/// ## Errors
/// Returns an error if XML writing fails or if the generated XML is
/// not valid UTF-8 (which should never happen with well-formed input).
pub fn serialize_multistatus(multistatus: &Multistatus) -> Result<String, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut elem = BytesStart::new("D:multistatus");
    elem.push_attribute(("xmlns:D", "DAV:"));
    elem.push_attribute(("xmlns:C", "urn:ietf:params:xml:ns:caldav"));
    writer.write_event(Event::Start(elem))?;

    for response in &multistatus.responses {
        write_response(&mut writer, response)?;
    }

    writer.write_event(Event::End(BytesEnd::new("D:multistatus")))?;

    let result = writer.into_inner();
    String::from_utf8(result).map_err(|e| {
        tracing::error!("generated invalid UTF-8 in multistatus XML: {}", e);
        quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "invalid UTF-8 in XML output",
        )))
    })
}

/// Writes a single response element.
fn write_response<W: std::io::Write>(
    writer: &mut Writer<W>,
    response: &PropstatResponse,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("D:response")))?;

    write_text_element(writer, "D:href", response.href.as_str())?;

    for propstat in &response.propstats {
        writer.write_event(Event::Start(BytesStart::new("D:propstat")))?;

        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        for prop in &propstat.properties {
            write_property(writer, prop)?;
        }
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        write_text_element(writer, "D:status", &propstat.status.status_line())?;

        writer.write_event(Event::End(BytesEnd::new("D:propstat")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("D:response")))?;

    Ok(())
}

/// Writes a property element.
fn write_property<W: std::io::Write>(
    writer: &mut Writer<W>,
    prop: &DavProperty,
) -> Result<(), quick_xml::Error> {
    let prefix = namespace_prefix(prop.name.namespace_uri());
    let elem_name = format!("{}:{}", prefix, prop.name.local_name());

    match &prop.value {
        Some(PropertyValue::Text(text) | PropertyValue::ContentData(text)) => {
            write_text_element(writer, &elem_name, text)?;
        }
        Some(PropertyValue::Empty) | None => {
            writer.write_event(Event::Empty(BytesStart::new(&elem_name)))?;
        }
    }

    Ok(())
}

/// Writes a simple text element.
fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Gets the namespace prefix for a given namespace URI.
fn namespace_prefix(ns: &str) -> &'static str {
    match ns {
        "urn:ietf:params:xml:ns:caldav" => "C",
        _ => "D",
    }
}
