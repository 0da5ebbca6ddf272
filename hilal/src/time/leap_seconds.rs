/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::warn;

/// TAI - UTC before the first leap second entry of 1972.
const PRE_1972_DELTA_AT: f64 = 10.0;

/// Bundled leap second table as `(jd_utc_effective, delta_at_seconds)` pairs,
/// strictly increasing by date. Values from the NAIF LSK (naif0012.tls).
const BUILTIN: [(f64, f64); 28] = [
    (2_441_317.5, 10.0), // 1972-01-01
    (2_441_499.5, 11.0), // 1972-07-01
    (2_441_683.5, 12.0), // 1973-01-01
    (2_442_048.5, 13.0), // 1974-01-01
    (2_442_413.5, 14.0), // 1975-01-01
    (2_442_778.5, 15.0), // 1976-01-01
    (2_443_144.5, 16.0), // 1977-01-01
    (2_443_509.5, 17.0), // 1978-01-01
    (2_443_874.5, 18.0), // 1979-01-01
    (2_444_239.5, 19.0), // 1980-01-01
    (2_444_786.5, 20.0), // 1981-07-01
    (2_445_151.5, 21.0), // 1982-07-01
    (2_445_516.5, 22.0), // 1983-07-01
    (2_446_247.5, 23.0), // 1985-07-01
    (2_447_161.5, 24.0), // 1988-01-01
    (2_447_892.5, 25.0), // 1990-01-01
    (2_448_257.5, 26.0), // 1991-01-01
    (2_448_804.5, 27.0), // 1992-07-01
    (2_449_169.5, 28.0), // 1993-07-01
    (2_449_534.5, 29.0), // 1994-07-01
    (2_450_083.5, 30.0), // 1996-01-01
    (2_450_630.5, 31.0), // 1997-07-01
    (2_451_179.5, 32.0), // 1999-01-01
    (2_453_736.5, 33.0), // 2006-01-01
    (2_454_832.5, 34.0), // 2009-01-01
    (2_456_109.5, 35.0), // 2012-07-01
    (2_457_204.5, 36.0), // 2015-07-01
    (2_457_754.5, 37.0), // 2017-01-01
];

/// Ordered `(jd_utc_effective, delta_at)` table. The lookup returns the entry
/// with the largest effective date at or before the query.
#[derive(Clone, Debug, PartialEq)]
pub struct LeapSecondTable {
    entries: Vec<(f64, f64)>,
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LeapSecondTable {
    /// The table bundled with this crate, covering 1972 through 2017.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
        }
    }

    /// TAI - UTC, in integer seconds, for the provided UTC Julian date.
    pub fn delta_at(&self, jd_utc: f64) -> f64 {
        let mut value = PRE_1972_DELTA_AT;
        for (jd_eff, delta_at) in &self.entries {
            if *jd_eff <= jd_utc {
                value = *delta_at;
            } else {
                break;
            }
        }
        value
    }

    /// Supplements this table from a NAIF LSK text kernel.
    ///
    /// The parser extracts the `DELTET/DELTA_AT = ( value, @YYYY-MON-DD ... )`
    /// assignment and converts each date to a UTC Julian date at midnight.
    /// Unknown lines are ignored.
    pub fn merge_lsk(&mut self, text: &str) {
        let Some(start) = text.find("DELTET/DELTA_AT") else {
            warn!("LSK text has no DELTET/DELTA_AT assignment, table unchanged");
            return;
        };
        let Some(open) = text[start..].find('(') else {
            warn!("malformed DELTET/DELTA_AT assignment, table unchanged");
            return;
        };
        let body_start = start + open + 1;
        let Some(close) = text[body_start..].find(')') else {
            warn!("unterminated DELTET/DELTA_AT assignment, table unchanged");
            return;
        };
        let body = &text[body_start..body_start + close];

        let mut parsed = Vec::new();
        let mut pending_value: Option<f64> = None;
        for token in body.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            if let Some(date) = token.strip_prefix('@') {
                let Some(value) = pending_value.take() else {
                    warn!("LSK date {date} has no leading leap second value, skipping");
                    continue;
                };
                match parse_lsk_date(date) {
                    Some(jd) => parsed.push((jd, value)),
                    None => warn!("could not parse LSK date `{date}`, skipping"),
                }
            } else if let Ok(value) = token.parse::<f64>() {
                pending_value = Some(value);
            }
        }

        if parsed.is_empty() {
            warn!("LSK text contained no leap second entries, table unchanged");
            return;
        }

        for (jd, value) in parsed {
            match self
                .entries
                .binary_search_by(|(e_jd, _)| e_jd.partial_cmp(&jd).unwrap())
            {
                Ok(idx) => self.entries[idx].1 = value,
                Err(idx) => self.entries.insert(idx, (jd, value)),
            }
        }
    }
}

/// Parses `YYYY-MON-DD` (NAIF month abbreviations) to a UTC JD at midnight,
/// i.e. the noon-based Julian day number minus 0.5.
fn parse_lsk_date(date: &str) -> Option<f64> {
    let mut parts = date.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month = match parts.next()? {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    let day: i64 = parts.next()?.parse().ok()?;
    Some(julian_day_number(year, month, day) as f64 - 0.5)
}

/// Fliegel-Van Flandern Julian day number (valid for the Gregorian calendar).
fn julian_day_number(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

#[cfg(test)]
mod ut_leap_seconds {
    use super::*;

    #[test]
    fn lookup_boundaries() {
        let table = LeapSecondTable::builtin();
        // Before the first entry
        assert_eq!(table.delta_at(2_440_000.0), 10.0);
        // Exactly at an effective date
        assert_eq!(table.delta_at(2_457_754.5), 37.0);
        // One microsecond before it
        assert_eq!(table.delta_at(2_457_754.5 - 1e-11), 36.0);
        // Far future: last known value
        assert_eq!(table.delta_at(2_470_000.0), 37.0);
    }

    #[test]
    fn julian_day_numbers() {
        // 2000-01-01 noon is JD 2451545
        assert_eq!(julian_day_number(2000, 1, 1), 2_451_545);
        // 1972-01-01 midnight is 2441317.5
        assert_eq!(julian_day_number(1972, 1, 1) as f64 - 0.5, 2_441_317.5);
    }

    #[test]
    fn lsk_parsing() {
        let text = r"
KPL/LSK
\begindata
DELTET/DELTA_T_A       =   32.184
DELTET/DELTA_AT        = ( 10,   @1972-JAN-1
                           11,   @1972-JUL-1
                           37,   @2017-JAN-1
                           38,   @2035-JAN-1 )
\begintext
";
        let mut table = LeapSecondTable::builtin();
        table.merge_lsk(text);
        // The hypothetical 2035 entry extends the table
        assert_eq!(table.delta_at(2_465_000.0), 38.0);
        // Existing entries are untouched
        assert_eq!(table.delta_at(2_451_545.0), 32.0);
    }

    #[test]
    fn garbage_lsk_is_ignored() {
        let mut table = LeapSecondTable::builtin();
        let before = table.clone();
        table.merge_lsk("not a kernel at all");
        assert_eq!(table, before);
    }
}
