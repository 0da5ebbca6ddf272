/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! New and full moon instants from Meeus Ch. 49: the mean-phase polynomial in
//! the lunation number k plus the 25-term periodic corrections.

use crate::constants::{J2000_JD, SYNODIC_MONTH_DAYS};
use crate::math::angles::between_0_360;

/// Lunation number (k is an integer at new moons, half-integer at full moons)
/// closest to the provided TT Julian date.
fn lunation_near(jd_tt: f64) -> f64 {
    let year = 2000.0 + (jd_tt - J2000_JD) / 365.25;
    (year - 2000.0) * 12.368_5
}

/// Fundamental arguments of the phase polynomial at lunation `k`, in radians:
/// `(m, mp, f, omega, e)`.
fn phase_arguments(k: f64) -> (f64, f64, f64, f64, f64) {
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let m = between_0_360(2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3)
        .to_radians();
    let mp = between_0_360(
        201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3 - 0.000_000_058 * t4,
    )
    .to_radians();
    let f = between_0_360(
        160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3 + 0.000_000_011 * t4,
    )
    .to_radians();
    let omega =
        between_0_360(124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3)
            .to_radians();
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    (m, mp, f, omega, e)
}

/// Mean phase JDE (TT) at lunation `k`.
fn mean_phase_jde(k: f64) -> f64 {
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    2_451_550.097_66 + SYNODIC_MONTH_DAYS * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4
}

/// True new moon JDE (TT) at integer lunation `k`.
pub fn new_moon_jde(k: f64) -> f64 {
    let k = k.round();
    let (m, mp, f, omega, e) = phase_arguments(k);
    let correction = -0.40720 * mp.sin()
        + 0.17241 * e * m.sin()
        + 0.01608 * (2.0 * mp).sin()
        + 0.01039 * (2.0 * f).sin()
        + 0.00739 * e * (mp - m).sin()
        - 0.00514 * e * (mp + m).sin()
        + 0.00208 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin();
    mean_phase_jde(k) + correction
}

/// True full moon JDE (TT) at half-integer lunation `k`.
pub fn full_moon_jde(k: f64) -> f64 {
    let k = (k - 0.5).round() + 0.5;
    let (m, mp, f, omega, e) = phase_arguments(k);
    let correction = -0.40614 * mp.sin()
        + 0.17302 * e * m.sin()
        + 0.01614 * (2.0 * mp).sin()
        + 0.01043 * (2.0 * f).sin()
        + 0.00734 * e * (mp - m).sin()
        - 0.00515 * e * (mp + m).sin()
        + 0.00209 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin();
    mean_phase_jde(k) + correction
}

/// The new moon nearest to the provided TT Julian date.
pub fn nearest_new_moon(jd_tt: f64) -> f64 {
    let k = lunation_near(jd_tt).round();
    let candidates = [new_moon_jde(k - 1.0), new_moon_jde(k), new_moon_jde(k + 1.0)];
    nearest_of(&candidates, jd_tt)
}

/// The full moon nearest to the provided TT Julian date.
pub fn nearest_full_moon(jd_tt: f64) -> f64 {
    let k = (lunation_near(jd_tt) - 0.5).round() + 0.5;
    let candidates = [
        full_moon_jde(k - 1.0),
        full_moon_jde(k),
        full_moon_jde(k + 1.0),
    ];
    nearest_of(&candidates, jd_tt)
}

/// The first new moon at or before the provided TT Julian date.
pub fn previous_new_moon(jd_tt: f64) -> f64 {
    let mut k = lunation_near(jd_tt).round();
    let mut jde = new_moon_jde(k);
    while jde > jd_tt {
        k -= 1.0;
        jde = new_moon_jde(k);
    }
    jde
}

/// The first new moon strictly after the provided TT Julian date.
pub fn next_new_moon(jd_tt: f64) -> f64 {
    let mut k = lunation_near(jd_tt).round();
    let mut jde = new_moon_jde(k);
    while jde <= jd_tt {
        k += 1.0;
        jde = new_moon_jde(k);
    }
    jde
}

/// The first full moon strictly after the provided TT Julian date.
pub fn next_full_moon(jd_tt: f64) -> f64 {
    let mut k = (lunation_near(jd_tt) - 0.5).round() + 0.5;
    let mut jde = full_moon_jde(k);
    while jde <= jd_tt {
        k += 1.0;
        jde = full_moon_jde(k);
    }
    jde
}

fn nearest_of(candidates: &[f64], jd: f64) -> f64 {
    let mut best = candidates[0];
    for c in candidates {
        if (c - jd).abs() < (best - jd).abs() {
            best = *c;
        }
    }
    best
}

#[cfg(test)]
mod ut_phases {
    use super::*;

    /// Meeus example 49.a: the new moon of 1977 February 18 at 03:37:42 TD,
    /// JDE 2443192.65118.
    #[test]
    fn meeus_example_49a() {
        // The periodic table reproduces the published instant to about a
        // minute; the remaining offset is the planetary A-corrections.
        let jde = new_moon_jde(-283.0);
        assert!((jde - 2_443_192.651_18).abs() < 0.002, "jde {jde}");
    }

    #[test]
    fn synodic_month_length() {
        // The gap between consecutive new moons stays within [29.0, 30.1] days
        for k in [-500.0, -100.0, 0.0, 150.0, 310.0] {
            let gap = new_moon_jde(k + 1.0) - new_moon_jde(k);
            assert!((29.0..30.1).contains(&gap), "synodic gap {gap} at k {k}");
        }
    }

    #[test]
    fn march_2025_new_moon() {
        // The new moon of 2025-03-29 occurred at 10:58 UTC
        let jd_march_29 = 2_460_763.5;
        let jde = nearest_new_moon(jd_march_29);
        assert!((jde - (2_460_763.5 + 10.97 / 24.0)).abs() < 0.02, "jde {jde}");
    }

    #[test]
    fn previous_next_bracket() {
        let jd = 2_460_700.0;
        let prev = previous_new_moon(jd);
        let next = next_new_moon(jd);
        assert!(prev <= jd);
        assert!(next > jd);
        let month = next - prev;
        assert!((29.0..30.1).contains(&month));
    }

    #[test]
    fn full_moon_interleaves() {
        let jd = 2_460_700.0;
        let prev_new = previous_new_moon(jd);
        let next_new = next_new_moon(jd);
        let full = next_full_moon(prev_new);
        assert!(full > prev_new && full < next_new);
        // Roughly half a synodic month after the new moon
        let offset = full - prev_new;
        assert!((13.0..17.0).contains(&offset), "offset {offset}");
    }
}
