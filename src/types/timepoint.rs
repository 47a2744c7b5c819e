// Timepoints and Modified Julian Day conversion

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Offset between the integer Julian Day Number of a date and its
/// Modified Julian Day (MJD 0 is 1858-11-17).
const JDN_MJD_OFFSET: i64 = 2_400_001;

/// A point in time as carried by the wire format: a calendar date
/// (encoded as MJD), time of day to the second, and an optional local
/// time offset in half-hour units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timepoint {
    /// The all-zero wire pattern, meaning "unspecified / now".
    Unspecified,
    At {
        datetime: NaiveDateTime,
        /// Local time offset in half-hour units, when present on the
        /// wire. Negative values are west of UTC.
        offset_half_hours: Option<i8>,
    },
}

impl Timepoint {
    /// A timepoint with no local time offset on the wire.
    pub fn utc(datetime: NaiveDateTime) -> Self {
        Timepoint::At {
            datetime,
            offset_half_hours: None,
        }
    }

    pub fn with_offset(datetime: NaiveDateTime, half_hours: i8) -> Self {
        Timepoint::At {
            datetime,
            offset_half_hours: Some(half_hours),
        }
    }
}

/// Modified Julian Day of a Gregorian calendar date.
///
/// Integer Gregorian -> Julian Day Number formula; all divisions are
/// floor divisions, which plain `/` provides here because every
/// intermediate operand is non-negative for representable dates.
pub fn mjd_from_date(date: NaiveDate) -> i64 {
    use chrono::Datelike;
    let y = i64::from(date.year());
    let m = i64::from(date.month());
    let d = i64::from(date.day());
    let a = (14 - m) / 12;
    let y = y + 4800 - a;
    let m = m + 12 * a - 3;
    let jdn = d + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    jdn - JDN_MJD_OFFSET
}

/// Calendar date for an MJD value, the inverse of [`mjd_from_date`].
/// Returns `None` when the resulting date is out of calendar range.
pub fn date_from_mjd(mjd: i64) -> Option<NaiveDate> {
    let jdn = mjd + JDN_MJD_OFFSET;
    let a = jdn + 32044;
    let b = (4 * a + 3) / 146097;
    let c = a - 146097 * b / 4;
    let d = (4 * c + 3) / 1461;
    let e = c - 1461 * d / 4;
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = 100 * b + d - 4800 + m / 10;
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}
