//! QSO listing, retrieval and maintenance endpoints

use crate::error::{ApiError, ErrorResponse, INVALID_PARAMETERS, api_error, qso_error};
use crate::state::AppState;
use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Json},
};
use hamlog_core::config::ApiConfig;
use hamlog_core::{ListQuery, Qso, QsoId, SortDirection, SortKey};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Response header carrying the filtered record count of a listing
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Base path of the QSO collection
pub const QSOS_PATH: &str = "/api/v1/qsos";

/// Query parameters for listing QSOs
///
/// Names are camelCase; the all-lowercase and PascalCase spellings are
/// accepted as well.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListQsosQuery {
    /// One-based page index
    #[serde(alias = "pagenumber", alias = "PageNumber")]
    #[validate(range(min = 1))]
    pub page_number: Option<i64>,

    /// Records per page; capped at `api.max_page_size`
    #[serde(alias = "pagesize", alias = "PageSize")]
    #[validate(range(min = 1))]
    pub page_size: Option<i64>,

    /// `datetime`, `callsign`, `band`, `mode` or `freq`
    #[serde(alias = "sortkey", alias = "SortKey")]
    pub sort_key: Option<String>,

    /// `asc` or `desc`
    #[serde(alias = "sortdirection", alias = "SortDirection")]
    pub sort_direction: Option<String>,

    /// Case-insensitive callsign substring
    #[serde(alias = "callsigncontains", alias = "CallsignContains")]
    pub callsign_contains: Option<String>,
}

impl ListQsosQuery {
    /// Resolve defaults and limits into an engine query
    #[must_use]
    pub fn into_list_query(self, api: &ApiConfig) -> ListQuery {
        let defaults = ListQuery::default();
        ListQuery {
            page_number: self
                .page_number
                .map_or(defaults.page_number, saturate_u32),
            page_size: self
                .page_size
                .map_or(api.default_page_size, saturate_u32),
            sort_key: self
                .sort_key
                .as_deref()
                .map_or(defaults.sort_key, SortKey::parse),
            sort_direction: self
                .sort_direction
                .as_deref()
                .map_or(defaults.sort_direction, SortDirection::parse),
            callsign_contains: self.callsign_contains,
        }
        .clamp_page_size(api.max_page_size)
    }
}

fn saturate_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// List QSOs with filtering, sorting and pagination
///
/// The body is the requested page; the `X-Total-Count` header holds the
/// number of records matching the filter across all pages.
///
/// # Errors
///
/// * `BAD_REQUEST` - `pageNumber` or `pageSize` below 1, or unparsable
/// * `INTERNAL_SERVER_ERROR` - storage failure
///
/// # Example
///
/// ```text
/// GET /api/v1/qsos?pageNumber=2&pageSize=25&sortKey=callsign&sortDirection=asc&callsignContains=w1
/// ```
pub async fn list_qsos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQsosQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Unparsable list parameters: {}", rejection.body_text());
        api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid query parameters", INVALID_PARAMETERS)
                .with_details(serde_json::json!(rejection.body_text())),
        )
    })?;

    if let Err(validation_errors) = query.validate() {
        warn!("Invalid query parameters: {:?}", validation_errors);
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid query parameters", INVALID_PARAMETERS)
                .with_details(serde_json::json!(validation_errors)),
        ));
    }

    let list_query = query.into_list_query(&state.config.api);
    info!(
        page_number = list_query.page_number,
        page_size = list_query.page_size,
        sort_key = ?list_query.sort_key,
        sort_direction = ?list_query.sort_direction,
        callsign_contains = ?list_query.callsign_contains,
        "Listing QSOs"
    );

    let page = state.qsos.list(&list_query).await.map_err(qso_error)?;

    Ok((
        [(
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            page.total_count.to_string(),
        )],
        Json(page.items),
    ))
}

/// Fetch a single QSO
///
/// # Errors
///
/// * `NOT_FOUND` - no QSO with this id
/// * `INTERNAL_SERVER_ERROR` - storage failure
pub async fn get_qso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<QsoId>,
) -> Result<Json<Qso>, ApiError> {
    state.qsos.get(id).await.map(Json).map_err(qso_error)
}

/// Validate and store a new QSO
///
/// A JSON `null` body is treated as a missing record. Any `id` in the body
/// is ignored. Responds 201 with the stored record and its `Location`.
///
/// # Errors
///
/// * `BAD_REQUEST` - the record breaks a validation rule
/// * `INTERNAL_SERVER_ERROR` - storage failure
pub async fn create_qso(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Option<Qso>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(qso) = body.map_err(body_rejection)?;

    let created = state.qsos.create(qso).await.map_err(qso_error)?;
    let location = created
        .id
        .map(|id| format!("{QSOS_PATH}/{id}"))
        .unwrap_or_else(|| QSOS_PATH.to_string());
    info!(id = ?created.id, callsign = ?created.callsign, "QSO created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Validate and fully replace an existing QSO
///
/// The body may omit `id`; if present it must equal the path id.
///
/// # Errors
///
/// * `BAD_REQUEST` - validation failure or id mismatch
/// * `NOT_FOUND` - the QSO no longer exists
/// * `INTERNAL_SERVER_ERROR` - storage failure
pub async fn update_qso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<QsoId>,
    body: Result<Json<Option<Qso>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(qso) = body.map_err(body_rejection)?;

    state.qsos.update(id, qso).await.map_err(qso_error)?;
    info!(id, "QSO updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a QSO
///
/// # Errors
///
/// * `NOT_FOUND` - no QSO with this id
/// * `INTERNAL_SERVER_ERROR` - storage failure
pub async fn delete_qso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<QsoId>,
) -> Result<StatusCode, ApiError> {
    state.qsos.delete(id).await.map_err(qso_error)?;
    info!(id, "QSO deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    warn!("Rejected QSO body: {}", rejection.body_text());
    api_error(
        rejection.status(),
        ErrorResponse::new("Invalid QSO body", INVALID_PARAMETERS)
            .with_details(serde_json::json!(rejection.body_text())),
    )
}
