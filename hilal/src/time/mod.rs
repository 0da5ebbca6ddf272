/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The time scale chain: UTC to TAI to TT to TDB, and TT/UT1.
//!
//! `hifitime::Epoch` is the calendar instant type throughout the crate, but
//! the Julian dates of every scale are carried explicitly in [`TimeScales`] so
//! that the UT1 branch (ΔT overrides or the Espenak-Meeus polynomial) and the
//! SPICE-compatible ET seconds are under this crate's control.

pub mod delta_t;
pub mod leap_seconds;

use hifitime::Epoch;

pub use leap_seconds::LeapSecondTable;

use crate::constants::{DAYS_PER_CENTURY, J2000_JD, SECONDS_PER_DAY, TT_TAI_OFFSET_S};

/// All time scales for a single instant.
///
/// Invariants: `jd_tt - jd_utc = (delta_at + 32.184) / 86400` exactly;
/// `jd_tdb - jd_tt` is below ~2e-8 day; `jd_ut1 = jd_tt - delta_t / 86400`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeScales {
    /// The UTC instant these scales describe.
    pub epoch: Epoch,
    pub jd_utc: f64,
    pub jd_tt: f64,
    pub jd_tdb: f64,
    pub jd_ut1: f64,
    /// TT - UT1 in seconds.
    pub delta_t: f64,
    /// TAI - UTC in seconds.
    pub delta_at: f64,
}

/// Converts an instant to a UTC Julian date. The inverse of [`jd_to_epoch`].
pub fn epoch_to_jd_utc(epoch: Epoch) -> f64 {
    epoch.to_unix_seconds() / SECONDS_PER_DAY + 2_440_587.5
}

/// Converts a UTC Julian date back to an instant. The inverse of [`epoch_to_jd_utc`].
pub fn jd_to_epoch(jd_utc: f64) -> Epoch {
    Epoch::from_unix_seconds((jd_utc - 2_440_587.5) * SECONDS_PER_DAY)
}

/// TDB - TT in seconds, from the standard two-term sine expression. Although
/// below two milliseconds, it is applied so ET matches SPICE.
pub fn tdb_minus_tt_seconds(jd_tt: f64) -> f64 {
    let g = (357.53 + 0.985_600_3 * (jd_tt - J2000_JD)).to_radians();
    0.001_658 * g.sin() + 0.000_014 * (2.0 * g).sin()
}

/// Seconds past J2000 TDB, the time argument expected by SPK records.
pub fn jd_tt_to_et(jd_tt: f64) -> f64 {
    (jd_tt - J2000_JD) * SECONDS_PER_DAY + tdb_minus_tt_seconds(jd_tt)
}

/// Julian centuries of TT since J2000.
pub fn julian_centuries(jd_tt: f64) -> f64 {
    (jd_tt - J2000_JD) / DAYS_PER_CENTURY
}

impl TimeScales {
    /// Builds the full chain for a UTC instant.
    ///
    /// The UT1 branch picks, in order: the `ut1_utc` override if provided, the
    /// `delta_t` override if provided, then the Espenak-Meeus ΔT polynomial.
    pub fn compute(
        epoch: Epoch,
        table: &LeapSecondTable,
        delta_t_override: Option<f64>,
        ut1_utc_override: Option<f64>,
    ) -> Self {
        let jd_utc = epoch_to_jd_utc(epoch);
        let delta_at = table.delta_at(jd_utc);
        let jd_tai = jd_utc + delta_at / SECONDS_PER_DAY;
        let jd_tt = jd_tai + TT_TAI_OFFSET_S / SECONDS_PER_DAY;
        let jd_tdb = jd_tt + tdb_minus_tt_seconds(jd_tt) / SECONDS_PER_DAY;

        let jd_ut1 = if let Some(ut1_utc) = ut1_utc_override {
            jd_utc + ut1_utc / SECONDS_PER_DAY
        } else if let Some(dt) = delta_t_override {
            jd_tt - dt / SECONDS_PER_DAY
        } else {
            let year = 2000.0 + (jd_tt - J2000_JD) / 365.25;
            jd_tt - delta_t::delta_t_seconds(year) / SECONDS_PER_DAY
        };

        Self {
            epoch,
            jd_utc,
            jd_tt,
            jd_tdb,
            jd_ut1,
            delta_t: (jd_tt - jd_ut1) * SECONDS_PER_DAY,
            delta_at,
        }
    }

    /// Reconstructs approximate time scales from ET seconds alone.
    ///
    /// `jd_tt ≈ J2000 + et/86400`; UTC is estimated by subtracting the leap
    /// seconds in effect about a minute earlier, which keeps the estimate
    /// about a second accurate across a leap second boundary. Adequate for
    /// event timing.
    pub fn from_et_approx(
        et: f64,
        table: &LeapSecondTable,
        delta_t_override: Option<f64>,
        ut1_utc_override: Option<f64>,
    ) -> Self {
        let jd_tt = J2000_JD + et / SECONDS_PER_DAY;
        let delta_at = table.delta_at(jd_tt - 70.0 / SECONDS_PER_DAY);
        let jd_utc = jd_tt - (delta_at + TT_TAI_OFFSET_S) / SECONDS_PER_DAY;
        Self::compute(
            jd_to_epoch(jd_utc),
            table,
            delta_t_override,
            ut1_utc_override,
        )
    }

    /// ET seconds past J2000 TDB for this instant.
    pub fn et(&self) -> f64 {
        jd_tt_to_et(self.jd_tt)
    }
}

#[cfg(test)]
mod ut_time {
    use super::*;

    #[test]
    fn jd_round_trip() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2025, 3, 29);
        let jd = epoch_to_jd_utc(epoch);
        // 2025-03-29T00:00:00 UTC
        assert!((jd - 2_460_763.5).abs() < 1e-9);
        let back = jd_to_epoch(jd);
        assert!((back - epoch).to_seconds().abs() < 1e-6);
    }

    #[test]
    fn tt_chain_identity() {
        let table = LeapSecondTable::builtin();
        let ts = TimeScales::compute(
            Epoch::from_gregorian_utc_at_midnight(2025, 3, 29),
            &table,
            None,
            None,
        );
        assert_eq!(ts.delta_at, 37.0);
        let identity = ts.jd_tt - ts.jd_utc - (ts.delta_at + 32.184) / 86_400.0;
        assert!(identity.abs() < 1e-12);
        // TDB stays within 2 ms of TT
        assert!((ts.jd_tdb - ts.jd_tt).abs() * 86_400.0 < 2e-3);
        // UT1 from the ΔT polynomial: 2025 has ΔT around 74.5 s
        assert!((ts.delta_t - 74.5).abs() < 1.0);
        assert!((ts.jd_ut1 - (ts.jd_tt - ts.delta_t / 86_400.0)).abs() < 1e-12);
    }

    #[test]
    fn overrides_take_precedence() {
        let table = LeapSecondTable::builtin();
        let epoch = Epoch::from_gregorian_utc_at_midnight(2025, 3, 29);
        let with_dt = TimeScales::compute(epoch, &table, Some(69.2), None);
        assert!((with_dt.delta_t - 69.2).abs() < 1e-9);

        // ut1_utc wins over delta_t
        let with_ut1 = TimeScales::compute(epoch, &table, Some(69.2), Some(0.05));
        assert!((with_ut1.jd_ut1 - (with_ut1.jd_utc + 0.05 / 86_400.0)).abs() < 1e-12);
    }

    #[test]
    fn et_bootstrap_is_consistent() {
        let table = LeapSecondTable::builtin();
        let ts = TimeScales::compute(
            Epoch::from_gregorian_utc_at_midnight(2025, 3, 29),
            &table,
            None,
            None,
        );
        let et = ts.et();
        let rebuilt = TimeScales::from_et_approx(et, &table, None, None);
        // The bootstrap keeps UTC within a second
        assert!(((rebuilt.jd_utc - ts.jd_utc) * 86_400.0).abs() < 1.0);
        assert!((rebuilt.et() - et).abs() < 1.0);
    }

    #[test]
    fn et_at_j2000() {
        // At jd_tt = J2000, ET is only the TDB-TT periodic term
        let et = jd_tt_to_et(J2000_JD);
        assert!(et.abs() < 2e-3);
    }
}
