//! Property resolution for multistatus responses.

use sundial_rfc::rfc::dav::core::{
    DavProperty, Href, PropertyValue, PropstatResponse, QName,
};

/// Everything a resolver may draw on for one object.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Object uid.
    pub uid: &'a str,
    /// Rendered iCalendar text.
    pub ics: &'a str,
    /// Entity tag for the rendered text.
    pub etag: &'a str,
}

/// Resolves one property against an object's context.
pub type PropertyResolver = fn(&ResolveContext<'_>) -> PropertyValue;

/// Registry mapping property names to resolver functions.
///
/// New properties register a resolver; nothing else changes. Names
/// with no resolver land in the 404 propstat group.
pub struct PropertyRegistry {
    resolvers: Vec<(QName, PropertyResolver)>,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Registers a resolver for a property name.
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&mut self, name: QName, resolver: PropertyResolver) {
        self.resolvers.retain(|(n, _)| *n != name);
        self.resolvers.push((name, resolver));
    }

    /// Resolves a property name, if a resolver is registered.
    #[must_use]
    pub fn resolve(&self, name: &QName, ctx: &ResolveContext<'_>) -> Option<PropertyValue> {
        self.resolvers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, resolver)| resolver(ctx))
    }

    /// Builds the response entry for one object.
    ///
    /// Requested properties resolve in request order; resolved ones go
    /// to the 200 propstat group, unrecognized ones to the 404 group.
    #[must_use]
    pub fn build_response(
        &self,
        href: Href,
        properties: &[QName],
        ctx: &ResolveContext<'_>,
    ) -> PropstatResponse {
        let mut found = Vec::new();
        let mut not_found = Vec::new();

        for name in properties {
            match self.resolve(name, ctx) {
                Some(value) => found.push(DavProperty {
                    name: name.clone(),
                    value: Some(value),
                }),
                None => not_found.push(DavProperty::not_found(name.clone())),
            }
        }

        PropstatResponse::with_found_and_not_found(href, found, not_found)
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(QName::dav("getetag"), |ctx| {
            PropertyValue::Text(ctx.etag.to_string())
        });
        registry.register(QName::caldav("calendar-data"), |ctx| {
            PropertyValue::ContentData(ctx.ics.to_string())
        });
        registry
    }
}
