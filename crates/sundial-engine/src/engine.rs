//! Query engine orchestrator.
//!
//! Linear pipeline per request: parse the report body, fetch candidate
//! objects from the store, decode each, render the multistatus. A
//! fatal error at any step short-circuits; per-object decode failures
//! only skip that object.

use std::time::Duration;

use sundial_core::config::Settings;
use sundial_core::constants::{DEFAULT_STORE_TIMEOUT_SECS, MULTISTATUS_CONTENT_TYPE};
use sundial_rfc::rfc::dav::build::serialize_multistatus;
use sundial_rfc::rfc::dav::core::{Multistatus, ReportRequest};
use sundial_rfc::rfc::ical::core::ComponentKind;
use uuid::Uuid;

use crate::codec::{self, NormalizedEvent};
use crate::error::EngineError;
use crate::href::{DavPathScheme, HrefScheme};
use crate::resolver::{PropertyRegistry, ResolveContext};
use crate::store::{CalendarObject, CalendarStore};
use sundial_rfc::rfc::dav::parse::ReportRegistry;

/// The rendered result of a successful query.
#[derive(Debug)]
pub struct QueryOutcome {
    /// HTTP status for the transport (always 207).
    pub status: u16,
    /// Response content type.
    pub content_type: &'static str,
    /// Serialized multistatus XML.
    pub body: String,
    /// Objects skipped because their documents failed to decode.
    pub skipped: usize,
}

/// CalDAV calendar-query engine over a pluggable store.
pub struct QueryEngine<S> {
    store: S,
    reports: ReportRegistry,
    properties: PropertyRegistry,
    hrefs: Box<dyn HrefScheme>,
    store_timeout: Duration,
}

impl<S: CalendarStore> QueryEngine<S> {
    /// Creates an engine with default registries, the `/dav` path
    /// scheme, and the default store deadline.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            reports: ReportRegistry::default(),
            properties: PropertyRegistry::default(),
            hrefs: Box::new(DavPathScheme::default()),
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }

    /// Creates an engine configured from settings.
    #[must_use]
    pub fn with_settings(store: S, settings: &Settings) -> Self {
        let mut engine = Self::new(store);
        engine.hrefs = Box::new(DavPathScheme::new(settings.dav.href_prefix.clone()));
        engine.store_timeout = Duration::from_secs(settings.store.timeout_secs);
        engine
    }

    /// Replaces the report parser registry.
    #[must_use]
    pub fn with_report_registry(mut self, reports: ReportRegistry) -> Self {
        self.reports = reports;
        self
    }

    /// Replaces the property resolver registry.
    #[must_use]
    pub fn with_property_registry(mut self, properties: PropertyRegistry) -> Self {
        self.properties = properties;
        self
    }

    /// Replaces the href scheme.
    #[must_use]
    pub fn with_href_scheme(mut self, hrefs: impl HrefScheme + 'static) -> Self {
        self.hrefs = Box::new(hrefs);
        self
    }

    /// Replaces the store deadline.
    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Executes a calendar-query REPORT against a collection.
    ///
    /// ## Errors
    /// Returns [`EngineError`] for malformed request bodies and store
    /// failures; use [`EngineError::http_status`] for the transport
    /// status. Per-object decode failures are logged and counted in
    /// [`QueryOutcome::skipped`], never propagated.
    #[tracing::instrument(skip(self, body), fields(collection = %collection))]
    pub async fn execute(
        &self,
        collection: Uuid,
        body: &[u8],
    ) -> Result<QueryOutcome, EngineError> {
        let ReportRequest::CalendarQuery(filter) = self.reports.parse(body)?;

        let objects = match filter.component {
            ComponentKind::Event => self.fetch(collection, &filter).await?,
            ComponentKind::Todo => {
                // Todo filtering is a documented stub: always empty.
                if filter.time_range.is_some() {
                    tracing::warn!(%collection, "ignoring time-range on VTODO filter");
                }
                tracing::warn!(%collection, "VTODO filtering not supported, returning empty result");
                Vec::new()
            }
            _ => {
                tracing::debug!(
                    %collection,
                    component = %filter.component,
                    "unsupported component filter, returning empty result"
                );
                Vec::new()
            }
        };

        let mut decoded: Vec<(CalendarObject, NormalizedEvent)> = Vec::with_capacity(objects.len());
        let mut skipped = 0usize;
        for object in objects {
            match codec::decode(&object.document) {
                Ok(event) => decoded.push((object, event)),
                Err(e) => {
                    tracing::warn!(uid = %object.uid, error = %e, "skipping undecodable object");
                    skipped += 1;
                }
            }
        }

        // Store return order is not guaranteed; uid order keeps the
        // response deterministic.
        decoded.sort_by(|(a, _), (b, _)| a.uid.cmp(&b.uid));

        let mut multistatus = Multistatus::new();
        for (object, event) in &decoded {
            let ics = codec::encode(event, filter.component);
            let etag = codec::etag(&ics);
            let ctx = ResolveContext {
                uid: &object.uid,
                ics: &ics,
                etag: &etag,
            };
            let href = self.hrefs.href_for(&object.uid);
            multistatus.add_response(self.properties.build_response(href, &filter.properties, &ctx));
        }

        let body = serialize_multistatus(&multistatus)
            .map_err(|e| EngineError::Internal(e.to_string()))?;

        tracing::debug!(
            %collection,
            responses = decoded.len(),
            skipped,
            "calendar-query rendered"
        );

        Ok(QueryOutcome {
            status: 207,
            content_type: MULTISTATUS_CONTENT_TYPE,
            body,
            skipped,
        })
    }

    async fn fetch(
        &self,
        collection: Uuid,
        filter: &sundial_rfc::rfc::dav::core::QueryFilter,
    ) -> Result<Vec<CalendarObject>, EngineError> {
        let fetch = self
            .store
            .find_objects(collection, filter.component, filter.time_range.as_ref());

        match tokio::time::timeout(self.store_timeout, fetch).await {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::StoreTimeout(self.store_timeout.as_secs())),
        }
    }
}
