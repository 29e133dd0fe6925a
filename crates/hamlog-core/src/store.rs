//! Storage abstraction consumed by the QSO service

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::types::{Qso, QsoId};
use crate::Result;

/// Persistence operations for QSO records
///
/// Implementations serialise concurrent writes. Identifiers are assigned by
/// the store on insert.
#[async_trait]
pub trait QsoStore: Send + Sync {
    /// Persist a new record, ignoring any `id` it carries, and return it with
    /// the assigned identifier
    async fn insert(&self, qso: &Qso) -> Result<Qso>;

    /// Overwrite the record identified by `qso.id`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] when no row was written.
    async fn update(&self, qso: &Qso) -> Result<()>;

    /// Remove a record; `false` when it did not exist
    async fn delete(&self, id: QsoId) -> Result<bool>;

    /// Fetch a single record
    async fn find_by_id(&self, id: QsoId) -> Result<Option<Qso>>;

    /// Whether a record with `id` exists
    async fn exists(&self, id: QsoId) -> Result<bool>;

    /// Stream every record, ordered by id
    fn stream_all(&self) -> BoxStream<'_, Result<Qso>>;
}
