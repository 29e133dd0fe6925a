//! Filtering, sorting and pagination over QSO collections

use std::cmp::Ordering;

use futures::{Stream, TryStreamExt, future};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::Qso;

/// Page number used when none is requested
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Contact start time
    #[default]
    DateTime,
    /// Contacted station's callsign
    Callsign,
    /// Band label
    Band,
    /// Transmission mode
    Mode,
    /// Transmit frequency
    Freq,
}

impl SortKey {
    /// Resolve a client-supplied key, ignoring case
    ///
    /// Unknown keys fall back to [`SortKey::DateTime`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "callsign" => Self::Callsign,
            "band" => Self::Band,
            "mode" => Self::Mode,
            "freq" => Self::Freq,
            _ => Self::DateTime,
        }
    }

    fn compare(self, a: &Qso, b: &Qso) -> Ordering {
        match self {
            Self::DateTime => a.started_at().cmp(&b.started_at()),
            Self::Callsign => compare_text(a.callsign.as_deref(), b.callsign.as_deref()),
            Self::Band => compare_text(a.band.as_deref(), b.band.as_deref()),
            Self::Mode => compare_text(a.mode.as_deref(), b.mode.as_deref()),
            Self::Freq => match (a.freq, b.freq) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
        }
    }
}

/// Ordering direction of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

impl SortDirection {
    /// Resolve a client-supplied direction
    ///
    /// Only `asc` (any case) is ascending; everything else is descending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Parameters of a list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// One-based page index
    pub page_number: u32,
    /// Records per page
    pub page_size: u32,
    /// Ordering field
    pub sort_key: SortKey,
    /// Ordering direction
    pub sort_direction: SortDirection,
    /// Case-insensitive callsign substring; blank disables filtering
    pub callsign_contains: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            callsign_contains: None,
        }
    }
}

impl ListQuery {
    /// Cap the page size at `max`
    #[must_use]
    pub fn clamp_page_size(mut self, max: u32) -> Self {
        self.page_size = self.page_size.min(max);
        self
    }

    /// Number of filtered records preceding the requested page
    #[must_use]
    pub fn offset(&self) -> usize {
        let pages_before = usize::try_from(self.page_number.saturating_sub(1)).unwrap_or(usize::MAX);
        pages_before.saturating_mul(self.limit())
    }

    fn limit(&self) -> usize {
        usize::try_from(self.page_size).unwrap_or(usize::MAX)
    }

    fn filter(&self) -> CallsignFilter {
        CallsignFilter::new(self.callsign_contains.as_deref())
    }
}

/// One page of a listing and the size of the whole filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Records matching the filter, before pagination
    pub total_count: usize,
}

struct CallsignFilter {
    needle: Option<String>,
}

impl CallsignFilter {
    fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .filter(|n| !n.trim().is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    fn matches(&self, qso: &Qso) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => qso
                .callsign
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Run `query` over an in-memory collection
#[must_use]
pub fn list<I>(records: I, query: &ListQuery) -> Page<Qso>
where
    I: IntoIterator<Item = Qso>,
{
    let filter = query.filter();
    let matching: Vec<Qso> = records.into_iter().filter(|q| filter.matches(q)).collect();
    paginate(matching, query)
}

/// Run `query` over a fallible record stream
///
/// Records are filtered as they arrive, so only matches are buffered.
///
/// # Errors
///
/// Returns the first error yielded by the stream.
pub async fn list_stream<S>(records: S, query: &ListQuery) -> Result<Page<Qso>>
where
    S: Stream<Item = Result<Qso>>,
{
    let filter = query.filter();
    let matching: Vec<Qso> = records
        .try_filter(|q| future::ready(filter.matches(q)))
        .try_collect()
        .await?;
    Ok(paginate(matching, query))
}

fn paginate(mut matching: Vec<Qso>, query: &ListQuery) -> Page<Qso> {
    let total_count = matching.len();
    let key = query.sort_key;
    let direction = query.sort_direction;

    matching.sort_by(|a, b| {
        let primary = key.compare(a, b);
        let primary = match direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });

    let items = matching
        .into_iter()
        .skip(query.offset())
        .take(query.limit())
        .collect();

    Page { items, total_count }
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase)),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}
