//! Calendar store adapter interface.

use sundial_rfc::rfc::dav::core::TimeRange;
use sundial_rfc::rfc::ical::core::ComponentKind;
use uuid::Uuid;

use crate::error::StoreError;

/// A stored calendar object.
///
/// The document is the raw stored payload; the codec gives it meaning.
/// Objects are read-only for the lifetime of a query.
#[derive(Debug, Clone)]
pub struct CalendarObject {
    /// Unique identifier within the collection.
    pub uid: String,
    /// Owning collection.
    pub collection: Uuid,
    /// Raw stored document.
    pub document: serde_json::Value,
}

/// Read access to a calendar collection.
///
/// Implementations own the storage technology (database, filesystem,
/// remote service). The engine treats `find_objects` as a pure read:
/// it may be slow, so the engine wraps the call in a deadline.
///
/// A `time_range` of `None` means all objects of the kind, regardless
/// of date. When a range is given the adapter does the date filtering;
/// the engine applies none of its own. [`TimeRange::overlaps`] is the
/// overlap test adapters are expected to use.
pub trait CalendarStore: Send + Sync {
    /// Finds candidate objects in a collection.
    ///
    /// ## Errors
    /// Returns [`StoreError`] when the backing store fails or times
    /// out on its own deadline.
    fn find_objects(
        &self,
        collection: Uuid,
        component: ComponentKind,
        time_range: Option<&TimeRange>,
    ) -> impl Future<Output = Result<Vec<CalendarObject>, StoreError>> + Send;
}

impl<S: CalendarStore> CalendarStore for std::sync::Arc<S> {
    fn find_objects(
        &self,
        collection: Uuid,
        component: ComponentKind,
        time_range: Option<&TimeRange>,
    ) -> impl Future<Output = Result<Vec<CalendarObject>, StoreError>> + Send {
        (**self).find_objects(collection, component, time_range)
    }
}
