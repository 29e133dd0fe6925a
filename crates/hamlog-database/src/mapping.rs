//! Conversions between the API record and the storage row
//!
//! Both directions destructure their input completely, so adding a field to
//! either type breaks the build until the mapping is extended.

use hamlog_core::Qso;

use crate::models::QsoDb;

impl From<QsoDb> for Qso {
    fn from(row: QsoDb) -> Self {
        let QsoDb {
            id,
            call,
            date_time,
            date_time_off,
            mode,
            band,
            band_rx,
            freq,
            freq_rx,
            name,
            comment,
            cont,
            country,
            cqz,
            distance,
            dxcc,
            email,
            gridsquare,
            ituz,
            lat,
            lon,
            my_city,
            my_country,
            my_cq_zone,
            my_gridsquare,
            my_itu_zone,
            my_lat,
            my_lon,
            my_name,
            operator,
            qsl_rcvd,
            qsl_sent,
            qsl_via,
            qth,
            rst_rcvd,
            rst_sent,
            station_callsign,
        } = row;

        Self {
            id: Some(id),
            callsign: call,
            date_time,
            date_time_off,
            mode,
            band,
            band_rx,
            freq,
            freq_rx,
            name,
            comment,
            continent: cont,
            country,
            cq_zone: cqz,
            distance,
            dxcc,
            email,
            gridsquare,
            itu_zone: ituz,
            lat,
            lon,
            my_city,
            my_country,
            my_cq_zone,
            my_gridsquare,
            my_itu_zone,
            my_lat,
            my_lon,
            my_name,
            operator,
            qsl_rcvd,
            qsl_sent,
            qsl_via,
            qth,
            rst_rcvd,
            rst_sent,
            station_callsign,
        }
    }
}

impl From<Qso> for QsoDb {
    fn from(qso: Qso) -> Self {
        let Qso {
            id,
            callsign,
            date_time,
            date_time_off,
            mode,
            band,
            band_rx,
            freq,
            freq_rx,
            name,
            comment,
            continent,
            country,
            cq_zone,
            distance,
            dxcc,
            email,
            gridsquare,
            itu_zone,
            lat,
            lon,
            my_city,
            my_country,
            my_cq_zone,
            my_gridsquare,
            my_itu_zone,
            my_lat,
            my_lon,
            my_name,
            operator,
            qsl_rcvd,
            qsl_sent,
            qsl_via,
            qth,
            rst_rcvd,
            rst_sent,
            station_callsign,
        } = qso;

        Self {
            id: id.unwrap_or_default(),
            call: callsign,
            date_time,
            date_time_off,
            mode,
            band,
            band_rx,
            freq,
            freq_rx,
            name,
            comment,
            cont: continent,
            country,
            cqz: cq_zone,
            distance,
            dxcc,
            email,
            gridsquare,
            ituz: itu_zone,
            lat,
            lon,
            my_city,
            my_country,
            my_cq_zone,
            my_gridsquare,
            my_itu_zone,
            my_lat,
            my_lon,
            my_name,
            operator,
            qsl_rcvd,
            qsl_sent,
            qsl_via,
            qth,
            rst_rcvd,
            rst_sent,
            station_callsign,
        }
    }
}
