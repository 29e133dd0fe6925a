//! QSO use cases composed from the validator, query engine and store

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::query::{self, ListQuery, Page};
use crate::store::QsoStore;
use crate::types::{Qso, QsoId};
use crate::validation::{ValidationError, Validator};

/// Outcome of a failed QSO operation
#[derive(Debug, Error)]
pub enum QsoError {
    /// The record broke a business rule
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No record with this identifier
    #[error("QSO {id} not found")]
    NotFound {
        /// Requested identifier
        id: QsoId,
    },

    /// The body identifier disagrees with the addressed one
    #[error("Path id {path_id} does not match body id {body_id}")]
    IdMismatch {
        /// Identifier from the request path
        path_id: QsoId,
        /// Identifier carried in the body
        body_id: QsoId,
    },

    /// Storage failed
    #[error(transparent)]
    Storage(#[from] crate::Error),
}

/// Result type for QSO operations
pub type QsoResult<T> = std::result::Result<T, QsoError>;

/// Entry point for every QSO operation exposed over HTTP
#[derive(Clone)]
pub struct QsoService {
    store: Arc<dyn QsoStore>,
    validator: Arc<Validator>,
}

impl QsoService {
    /// Create a service over `store` checking records with `validator`
    #[must_use]
    pub fn new(store: Arc<dyn QsoStore>, validator: Validator) -> Self {
        Self {
            store,
            validator: Arc::new(validator),
        }
    }

    /// The validator applied to writes
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// One page of records matching `query`, with the filtered total
    ///
    /// # Errors
    ///
    /// Returns a storage error if the records cannot be read.
    pub async fn list(&self, query: &ListQuery) -> QsoResult<Page<Qso>> {
        let page = query::list_stream(self.store.stream_all(), query).await?;
        debug!(
            returned = page.items.len(),
            total = page.total_count,
            "Listed QSOs"
        );
        Ok(page)
    }

    /// Fetch one record
    ///
    /// # Errors
    ///
    /// Returns [`QsoError::NotFound`] if no such record exists.
    pub async fn get(&self, id: QsoId) -> QsoResult<Qso> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(QsoError::NotFound { id })
    }

    /// Validate and store a new record
    ///
    /// Any identifier in `qso` is discarded; storage assigns a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`QsoError::Validation`] when the record breaks a rule.
    pub async fn create(&self, qso: Option<Qso>) -> QsoResult<Qso> {
        let mut qso = self.validator.validated(qso)?;
        qso.id = None;
        let created = self.store.insert(&qso).await?;
        debug!(id = ?created.id, callsign = ?created.callsign, "Created QSO");
        Ok(created)
    }

    /// Validate and fully replace the record at `id`
    ///
    /// A body without an identifier adopts `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QsoError::Validation`] for rule violations,
    /// [`QsoError::IdMismatch`] when the body names another record and
    /// [`QsoError::NotFound`] when the record is gone at write time.
    pub async fn update(&self, id: QsoId, qso: Option<Qso>) -> QsoResult<()> {
        let mut qso = self.validator.validated(qso)?;
        if let Some(body_id) = qso.id.filter(|body_id| *body_id != id) {
            return Err(QsoError::IdMismatch {
                path_id: id,
                body_id,
            });
        }
        qso.id = Some(id);

        match self.store.update(&qso).await {
            Ok(()) => {
                debug!(id, "Updated QSO");
                Ok(())
            }
            Err(conflict @ crate::Error::Conflict { .. }) => {
                if self.store.exists(id).await? {
                    warn!(id, "Update wrote nothing although the QSO still exists");
                    Err(conflict.into())
                } else {
                    Err(QsoError::NotFound { id })
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the record at `id`
    ///
    /// # Errors
    ///
    /// Returns [`QsoError::NotFound`] if no such record exists.
    pub async fn delete(&self, id: QsoId) -> QsoResult<()> {
        if self.store.delete(id).await? {
            debug!(id, "Deleted QSO");
            Ok(())
        } else {
            Err(QsoError::NotFound { id })
        }
    }
}

impl std::fmt::Debug for QsoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QsoService")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
