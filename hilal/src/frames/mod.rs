/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Transformations between the inertial GCRS frame and the Earth-fixed ITRS
//! frame: `ITRS = W · R · Q · GCRS`, where Q is the celestial-motion matrix
//! (precession-nutation via the CIP and CIO), R the Earth rotation, and W the
//! polar motion.

pub mod cip;
pub mod earth_rotation;
pub mod nutation;

use crate::math::rotation::{rot_x, rot_y};
use crate::math::{Matrix3, Vector3};
use crate::time::{julian_centuries, TimeScales};

use cip::celestial_motion_matrix;
use earth_rotation::earth_rotation_matrix;

/// Polar motion matrix W from the pole coordinates in radians (IERS Bulletin
/// A values; both default to zero when unavailable).
pub fn polar_motion_matrix(xp: f64, yp: f64) -> Matrix3 {
    rot_y(xp) * rot_x(-yp)
}

/// The full GCRS to ITRS matrix at the provided instant.
pub fn gcrs_to_itrs_matrix(ts: &TimeScales, xp: f64, yp: f64) -> Matrix3 {
    let t = julian_centuries(ts.jd_tt);
    let q = celestial_motion_matrix(t);
    let r = earth_rotation_matrix(ts.jd_ut1);
    let w = polar_motion_matrix(xp, yp);
    w * r * q
}

/// Rotates a GCRS vector into the Earth-fixed ITRS frame.
pub fn gcrs_to_itrs(v: &Vector3, ts: &TimeScales, xp: f64, yp: f64) -> Vector3 {
    gcrs_to_itrs_matrix(ts, xp, yp) * v
}

/// Rotates an ITRS vector back into GCRS. The inverse is built from the
/// explicit transposes `Qᵀ · Rᵀ · Wᵀ`, never by assuming orthonormality of
/// the combined product.
pub fn itrs_to_gcrs(v: &Vector3, ts: &TimeScales, xp: f64, yp: f64) -> Vector3 {
    let t = julian_centuries(ts.jd_tt);
    let q = celestial_motion_matrix(t);
    let r = earth_rotation_matrix(ts.jd_ut1);
    let w = polar_motion_matrix(xp, yp);
    q.transpose() * (r.transpose() * (w.transpose() * v))
}

#[cfg(test)]
mod ut_frames {
    use super::*;
    use crate::time::LeapSecondTable;
    use hifitime::Epoch;

    #[test]
    fn round_trip_micrometer() {
        let table = LeapSecondTable::builtin();
        let ts = TimeScales::compute(
            Epoch::from_gregorian_utc_hms(2025, 3, 29, 18, 30, 0),
            &table,
            None,
            None,
        );
        // A GCRS vector of lunar-distance magnitude, in km
        let v = Vector3::new(385_000.0, -12_345.6, 98_765.4);
        let there = gcrs_to_itrs(&v, &ts, 0.0, 0.0);
        let back = itrs_to_gcrs(&there, &ts, 0.0, 0.0);
        // < 1 µm = 1e-9 km
        assert!((back - v).norm() < 1e-9);
        // The rotation preserves the norm
        assert!((there.norm() - v.norm()).abs() < 1e-9);
    }

    #[test]
    fn polar_motion_default_is_identity() {
        let w = polar_motion_matrix(0.0, 0.0);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((w[(i, j)] - expected).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn earth_rotation_dominates() {
        // Two instants half a sidereal day apart must nearly flip x and y
        let table = LeapSecondTable::builtin();
        let ts0 = TimeScales::compute(
            Epoch::from_gregorian_utc_at_midnight(2025, 3, 29),
            &table,
            None,
            None,
        );
        let v = Vector3::new(6_378.0, 0.0, 0.0);
        let at0 = gcrs_to_itrs(&v, &ts0, 0.0, 0.0);
        let half_sidereal = 0.5 / 1.002_737_811_911_354_48;
        let ts1 = TimeScales::compute(
            crate::time::jd_to_epoch(ts0.jd_utc + half_sidereal),
            &table,
            None,
            None,
        );
        let at1 = gcrs_to_itrs(&v, &ts1, 0.0, 0.0);
        assert!((at0[0] + at1[0]).abs() < 1.0);
        assert!((at0[1] + at1[1]).abs() < 1.0);
    }
}
