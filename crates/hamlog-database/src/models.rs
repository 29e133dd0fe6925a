//! Storage model for hamlog

use sqlx::FromRow;

/// Row of the `qsos` table
///
/// Field names are the column names, which use short aliases (`call`,
/// `cont`, `cqz`, `ituz`) rather than the API names.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct QsoDb {
    /// Autoincrement primary key; `0` for a row not yet inserted
    pub id: i64,

    /// Contacted station's callsign
    pub call: Option<String>,

    /// Contact start, ISO-8601 text
    pub date_time: Option<String>,

    /// Contact end, ISO-8601 text
    pub date_time_off: Option<String>,

    /// Transmission mode
    pub mode: Option<String>,

    /// Band label
    pub band: Option<String>,

    /// Receive band label
    pub band_rx: Option<String>,

    /// Transmit frequency in MHz
    pub freq: Option<f64>,

    /// Receive frequency in MHz
    pub freq_rx: Option<f64>,

    /// Contacted operator's name
    pub name: Option<String>,

    /// Free-form comment
    pub comment: Option<String>,

    /// Continent
    pub cont: Option<String>,

    /// Country
    pub country: Option<String>,

    /// CQ zone
    pub cqz: Option<String>,

    /// Distance in km
    pub distance: Option<i32>,

    /// DXCC entity code
    pub dxcc: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Maidenhead locator
    pub gridsquare: Option<String>,

    /// ITU zone
    pub ituz: Option<String>,

    /// Latitude
    pub lat: Option<String>,

    /// Longitude
    pub lon: Option<String>,

    /// Logging station's city
    pub my_city: Option<String>,
    /// Logging station's country
    pub my_country: Option<String>,
    /// Logging station's CQ zone
    pub my_cq_zone: Option<String>,
    /// Logging station's locator
    pub my_gridsquare: Option<String>,
    /// Logging station's ITU zone
    pub my_itu_zone: Option<String>,
    /// Logging station's latitude
    pub my_lat: Option<String>,
    /// Logging station's longitude
    pub my_lon: Option<String>,
    /// Logging operator's name
    pub my_name: Option<String>,

    /// Operator callsign
    pub operator: Option<String>,

    /// QSL received status
    pub qsl_rcvd: Option<String>,

    /// QSL sent status
    pub qsl_sent: Option<String>,

    /// QSL routing
    pub qsl_via: Option<String>,

    /// Contacted station's location
    pub qth: Option<String>,

    /// Signal report received
    pub rst_rcvd: Option<String>,

    /// Signal report sent
    pub rst_sent: Option<String>,

    /// Logging station's on-air callsign
    pub station_callsign: Option<String>,
}
