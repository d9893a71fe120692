//! REPORT request XML parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::error::{ParseError, ParseResult};
use crate::rfc::dav::core::{Namespace, QName, QueryFilter, ReportRequest, TimeRange};
use crate::rfc::ical::core::{ComponentKind, parse_utc_timestamp};

/// A parser for one report type, keyed by its root element local name.
pub type ReportParser = fn(&[u8]) -> ParseResult<ReportRequest>;

/// Registry of report parsers.
///
/// The root element's local name selects the parser; unregistered
/// names fail with `UnsupportedReport`. New report types register a
/// parser function instead of growing a dispatch match.
pub struct ReportRegistry {
    parsers: Vec<(&'static str, ReportParser)>,
}

impl ReportRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registers a parser for a report root element.
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&mut self, root: &'static str, parser: ReportParser) {
        self.parsers.retain(|(name, _)| *name != root);
        self.parsers.push((root, parser));
    }

    /// Returns the parser for the given root element name.
    #[must_use]
    pub fn get(&self, root: &str) -> Option<ReportParser> {
        self.parsers
            .iter()
            .find(|(name, _)| *name == root)
            .map(|(_, parser)| *parser)
    }

    /// Parses a REPORT request body.
    ///
    /// Reads ahead to the root element, then dispatches to the
    /// registered parser for that report type.
    ///
    /// ## Errors
    /// Returns an error if the XML is malformed, the root element
    /// names an unregistered report type, or the selected parser
    /// rejects the body.
    pub fn parse(&self, xml: &[u8]) -> ParseResult<ReportRequest> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                    let local_name_bytes = e.local_name();
                    let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                    return match self.get(&local_name) {
                        Some(parser) => {
                            tracing::debug!(report = %local_name, "dispatching report parser");
                            parser(xml)
                        }
                        None => Err(ParseError::UnsupportedReport(local_name)),
                    };
                }
                Ok(Event::Eof) => {
                    return Err(ParseError::InvalidXml("missing report root element".into()));
                }
                Err(e) => return Err(ParseError::InvalidXml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }
    }
}

impl Default for ReportRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("calendar-query", parse_calendar_query);
        registry
    }
}

/// Parses a REPORT request body with the default registry.
///
/// ## Errors
/// Returns an error if the XML is malformed or the report type is not
/// supported.
pub fn parse_report(xml: &[u8]) -> ParseResult<ReportRequest> {
    ReportRegistry::default().parse(xml)
}

/// Parses a calendar-query report (RFC 4791 §7.8).
///
/// The wire structure is `<calendar-query><prop>...</prop><filter>
/// <comp-filter name="VCALENDAR"><comp-filter name="VEVENT">
/// [<time-range .../>]</comp-filter></comp-filter></filter>`.
/// The nested filter collapses into a flat [`QueryFilter`].
///
/// A missing filter, a top-level comp-filter other than VCALENDAR, or
/// an unrecognized inner component all yield `ComponentKind::Unknown`
/// rather than an error; the engine turns that into zero results.
///
/// ## Errors
/// Returns an error if the XML is malformed or a time-range is
/// invalid.
pub fn parse_calendar_query(xml: &[u8]) -> ParseResult<ReportRequest> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut namespaces: Vec<(String, String)> = Vec::new();
    let mut properties: Vec<QName> = Vec::new();
    let mut component: Option<ComponentKind> = None;
    let mut vcalendar_seen = false;
    let mut time_range: Option<TimeRange> = None;
    let mut in_prop = false;
    let mut in_filter = false;
    let mut depth: usize = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                collect_namespaces(e, &mut namespaces)?;
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                match local_name.as_str() {
                    "prop" if !in_filter => {
                        in_prop = true;
                    }
                    "filter" => {
                        in_filter = true;
                        depth = 1;
                    }
                    "comp-filter" if in_filter => {
                        handle_comp_filter(e, depth, &mut vcalendar_seen, &mut component)?;
                        depth += 1;
                    }
                    "time-range" if in_filter && depth >= 2 => {
                        time_range = Some(parse_time_range(e)?);
                        depth += 1;
                    }
                    _ if in_prop && !in_filter => {
                        push_property(&mut properties, resolve_qname(e, &namespaces)?);
                    }
                    _ if in_filter => {
                        depth += 1;
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                collect_namespaces(e, &mut namespaces)?;
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?.to_owned();

                match local_name.as_str() {
                    "comp-filter" if in_filter => {
                        handle_comp_filter(e, depth, &mut vcalendar_seen, &mut component)?;
                    }
                    "time-range" if in_filter && depth >= 2 => {
                        time_range = Some(parse_time_range(e)?);
                    }
                    _ if in_prop && !in_filter => {
                        push_property(&mut properties, resolve_qname(e, &namespaces)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name_bytes = e.local_name();
                let local_name = std::str::from_utf8(local_name_bytes.as_ref())?;
                match local_name {
                    "prop" if !in_filter => {
                        in_prop = false;
                    }
                    "filter" => {
                        in_filter = false;
                        depth = 0;
                    }
                    _ if in_filter => {
                        depth = depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::InvalidXml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(ReportRequest::CalendarQuery(QueryFilter {
        component: component.unwrap_or(ComponentKind::Unknown),
        time_range,
        properties,
    }))
}

/// Handles a comp-filter element at the given filter depth.
///
/// Depth 1 is the root filter element, so a comp-filter seen there
/// must be the VCALENDAR wrapper; anything else leaves the component
/// unresolved, which degrades to zero results. Depth 2 names the
/// queried component. Deeper comp-filters are ignored.
fn handle_comp_filter(
    e: &quick_xml::events::BytesStart<'_>,
    depth: usize,
    vcalendar_seen: &mut bool,
    component: &mut Option<ComponentKind>,
) -> ParseResult<()> {
    let name = get_attribute(e, "name")?;

    match depth {
        1 => {
            if name.eq_ignore_ascii_case("VCALENDAR") {
                *vcalendar_seen = true;
            } else {
                tracing::debug!(name = %name, "top-level comp-filter is not VCALENDAR");
            }
        }
        2 if *vcalendar_seen && component.is_none() => {
            *component = Some(match name.to_ascii_uppercase().as_str() {
                "VEVENT" => ComponentKind::Event,
                "VTODO" => ComponentKind::Todo,
                _ => ComponentKind::Unknown,
            });
        }
        _ => {}
    }

    Ok(())
}

/// Appends a requested property, ignoring duplicates.
///
/// Request order is preserved for the first occurrence of each name.
fn push_property(properties: &mut Vec<QName>, qname: QName) {
    if !properties.contains(&qname) {
        properties.push(qname);
    }
}

/// Parses a time-range element.
///
/// Both `start` and `end` attributes are required and must parse as
/// UTC timestamps with `start <= end`.
fn parse_time_range(elem: &quick_xml::events::BytesStart<'_>) -> ParseResult<TimeRange> {
    let mut start = None;
    let mut end = None;

    for attr in elem.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "start" => {
                start = Some(parse_utc_timestamp(value).ok_or_else(|| {
                    ParseError::InvalidTimeRange(format!("invalid start: {value}"))
                })?);
            }
            "end" => {
                end = Some(parse_utc_timestamp(value).ok_or_else(|| {
                    ParseError::InvalidTimeRange(format!("invalid end: {value}"))
                })?);
            }
            _ => {}
        }
    }

    let (Some(start), Some(end)) = (start, end) else {
        return Err(ParseError::InvalidTimeRange(
            "time-range requires both start and end".into(),
        ));
    };

    if start > end {
        return Err(ParseError::InvalidTimeRange(
            "start must not be after end".into(),
        ));
    }

    Ok(TimeRange { start, end })
}

/// Collects namespace declarations from an element's attributes.
fn collect_namespaces(
    e: &quick_xml::events::BytesStart<'_>,
    namespaces: &mut Vec<(String, String)>,
) -> ParseResult<()> {
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.push((prefix.to_string(), value.to_string()));
        } else if key == "xmlns" {
            namespaces.push((String::new(), value.to_string()));
        }
    }
    Ok(())
}

/// Gets a required attribute value from an element.
fn get_attribute(e: &quick_xml::events::BytesStart<'_>, name: &str) -> ParseResult<String> {
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if key == name {
            return Ok(std::str::from_utf8(&attr.value)?.to_owned());
        }
    }
    Err(ParseError::InvalidXml(format!(
        "missing required attribute: {name}"
    )))
}

/// Resolves an element name to a qualified name using in-scope
/// namespace declarations.
///
/// Innermost declarations win; names with no matching declaration
/// default to the `DAV:` namespace.
fn resolve_qname(
    e: &quick_xml::events::BytesStart<'_>,
    namespaces: &[(String, String)],
) -> ParseResult<QName> {
    let name_bytes = e.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?.to_owned();

    let (prefix, local_name) = if let Some(colon_pos) = name.find(':') {
        (
            name[..colon_pos].to_owned(),
            name[colon_pos + 1..].to_owned(),
        )
    } else {
        (String::new(), name)
    };

    let namespace = namespaces
        .iter()
        .rev()
        .find(|(p, _)| *p == prefix)
        .map_or("DAV:", |(_, ns)| ns.as_str());

    Ok(QName::new(Namespace::new(namespace.to_string()), local_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn parse_query(xml: &str) -> ParseResult<QueryFilter> {
        match parse_report(xml.as_bytes())? {
            ReportRequest::CalendarQuery(filter) => Ok(filter),
        }
    }

    #[test_log::test]
    fn parse_event_query_with_time_range() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <C:calendar-data/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="20240101T000000Z" end="20240201T000000Z"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();

        assert_eq!(filter.component, ComponentKind::Event);
        assert_eq!(
            filter.properties,
            vec![QName::dav("getetag"), QName::caldav("calendar-data")]
        );

        let range = filter.time_range.unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test_log::test]
    fn parse_query_without_time_range() {
        let xml = r#"<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><D:getetag/></D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT"/>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(filter.component, ComponentKind::Event);
        assert!(filter.time_range.is_none());
    }

    #[test_log::test]
    fn parse_todo_query() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VTODO"/>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(filter.component, ComponentKind::Todo);
        assert!(filter.properties.is_empty());
    }

    #[test_log::test]
    fn unrecognized_component_becomes_unknown() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VJOURNAL"/>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(filter.component, ComponentKind::Unknown);
    }

    #[test_log::test]
    fn missing_filter_degrades_to_unknown() {
        let xml = r#"<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><D:getetag/></D:prop>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(filter.component, ComponentKind::Unknown);
    }

    #[test_log::test]
    fn non_vcalendar_root_filter_degrades_to_unknown() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VEVENT"/>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(filter.component, ComponentKind::Unknown);
    }

    #[test_log::test]
    fn duplicate_properties_are_ignored() {
        let xml = r#"<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><D:getetag/><D:getetag/><C:calendar-data/></D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT"/>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(
            filter.properties,
            vec![QName::dav("getetag"), QName::caldav("calendar-data")]
        );
    }

    #[test_log::test]
    fn time_range_with_explicit_end_tag_is_parsed() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="20240101T000000Z" end="20240201T000000Z"></C:time-range>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        let filter = parse_query(xml).unwrap();

        let range = filter.time_range.unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test_log::test]
    fn inverted_time_range_with_explicit_end_tag_is_rejected() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="20240201T000000Z" end="20240101T000000Z"></C:time-range>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        assert!(matches!(
            parse_query(xml),
            Err(ParseError::InvalidTimeRange(_))
        ));
    }

    #[test_log::test]
    fn inverted_time_range_is_rejected() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="20240201T000000Z" end="20240101T000000Z"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        assert!(matches!(
            parse_query(xml),
            Err(ParseError::InvalidTimeRange(_))
        ));
    }

    #[test_log::test]
    fn time_range_missing_end_is_rejected() {
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav">
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="20240101T000000Z"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#;

        assert!(matches!(
            parse_query(xml),
            Err(ParseError::InvalidTimeRange(_))
        ));
    }

    #[test_log::test]
    fn unsupported_report_root() {
        let xml = r#"<C:calendar-multiget xmlns:C="urn:ietf:params:xml:ns:caldav"/>"#;

        assert!(matches!(
            parse_report(xml.as_bytes()),
            Err(ParseError::UnsupportedReport(name)) if name == "calendar-multiget"
        ));
    }

    #[test_log::test]
    fn malformed_xml() {
        let xml = "<C:calendar-query><unclosed";
        assert!(matches!(
            parse_report(xml.as_bytes()),
            Err(ParseError::InvalidXml(_))
        ));
    }

    #[test_log::test]
    fn default_namespace_resolution() {
        let xml = r#"<calendar-query xmlns="urn:ietf:params:xml:ns:caldav" xmlns:D="DAV:">
  <D:prop><D:getetag/><calendar-data/></D:prop>
  <filter>
    <comp-filter name="VCALENDAR">
      <comp-filter name="VEVENT"/>
    </comp-filter>
  </filter>
</calendar-query>"#;

        let filter = parse_query(xml).unwrap();
        assert_eq!(
            filter.properties,
            vec![QName::dav("getetag"), QName::caldav("calendar-data")]
        );
    }

    #[test_log::test]
    fn registry_rejects_unregistered_type() {
        let registry = ReportRegistry::empty();
        let xml = r#"<C:calendar-query xmlns:C="urn:ietf:params:xml:ns:caldav"/>"#;

        assert!(matches!(
            registry.parse(xml.as_bytes()),
            Err(ParseError::UnsupportedReport(_))
        ));
    }

    #[test_log::test]
    fn registry_dispatches_custom_parser() {
        fn stub(_: &[u8]) -> ParseResult<ReportRequest> {
            Ok(ReportRequest::CalendarQuery(QueryFilter::for_component(
                ComponentKind::Todo,
            )))
        }

        let mut registry = ReportRegistry::empty();
        registry.register("sync-collection", stub);

        let xml = r#"<D:sync-collection xmlns:D="DAV:"/>"#;
        let parsed = registry.parse(xml.as_bytes()).unwrap();
        let ReportRequest::CalendarQuery(filter) = parsed;
        assert_eq!(filter.component, ComponentKind::Todo);
    }
}
