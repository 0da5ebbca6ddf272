/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Kernel-free solar and lunar positions from Jean Meeus, "Astronomical
//! Algorithms": the Sun from Ch. 25 and the Moon from the truncated periodic
//! series of Ch. 47 (Tables 47.A and 47.B).
//!
//! Accuracy is about 0.01 deg for the Sun and 0.3 deg / 0.2 deg in lunar
//! longitude/latitude: sufficient for crescent visibility estimates, phase
//! and illumination, never for event timing better than a minute or so.

use crate::constants::AU_KM;
use crate::frames::cip::mean_obliquity;
use crate::math::angles::between_0_360;
use crate::math::Vector3;
use crate::time::julian_centuries;

/// Periodic terms for lunar longitude and distance (Table 47.A, 30 largest).
/// Each entry: multiples of (D, M, M', F), then the longitude coefficient in
/// 1e-6 degrees and the distance coefficient in 1e-3 km.
#[rustfmt::skip]
const MOON_LR: [(f64, f64, f64, f64, f64, f64); 30] = [
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0, -20_905_355.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0, -3_699_111.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0, -2_955_968.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0, -569_925.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0, 48_888.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0, -3_149.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0, 246_158.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0, -152_138.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0, -170_733.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0, -204_586.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0, -129_620.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0, 108_743.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0, 104_755.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0, 10_321.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0, 79_661.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0, -34_782.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0, -23_210.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0, -21_636.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0, 24_208.0),
    (2.0, 1.0, 0.0, 0.0, -6_766.0, 30_824.0),
    (1.0, 0.0, -1.0, 0.0, -5_163.0, -8_379.0),
    (1.0, 1.0, 0.0, 0.0, 4_987.0, -16_675.0),
    (2.0, -1.0, 1.0, 0.0, 4_036.0, -12_831.0),
    (2.0, 0.0, 2.0, 0.0, 3_994.0, -10_445.0),
    (4.0, 0.0, 0.0, 0.0, 3_861.0, -11_650.0),
    (2.0, 0.0, -3.0, 0.0, 3_665.0, 14_403.0),
    (0.0, 1.0, -2.0, 0.0, -2_689.0, -7_003.0),
    (2.0, 0.0, -1.0, 2.0, -2_602.0, 0.0),
    (2.0, -1.0, -2.0, 0.0, 2_390.0, 10_056.0),
];

/// Periodic terms for lunar latitude (Table 47.B, 20 largest).
/// Each entry: multiples of (D, M, M', F) and the coefficient in 1e-6 degrees.
#[rustfmt::skip]
const MOON_B: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
    (2.0, 0.0, 1.0, -1.0, 9_266.0),
    (0.0, 0.0, 2.0, -1.0, 8_822.0),
    (2.0, -1.0, 0.0, -1.0, 8_216.0),
    (2.0, 0.0, -2.0, -1.0, 4_324.0),
    (2.0, 0.0, 1.0, 1.0, 4_200.0),
    (2.0, 1.0, 0.0, -1.0, -3_359.0),
    (2.0, -1.0, -1.0, 1.0, 2_463.0),
    (2.0, -1.0, 0.0, 1.0, 2_211.0),
    (2.0, -1.0, -1.0, -1.0, 2_065.0),
    (0.0, 1.0, -1.0, -1.0, -1_870.0),
    (4.0, 0.0, -1.0, -1.0, 1_828.0),
    (0.0, 1.0, 0.0, 1.0, -1_794.0),
];

/// Lunar fundamental arguments for the Ch. 47 series, in degrees.
struct LunarArguments {
    /// Mean longitude L'
    lp: f64,
    /// Mean elongation D
    d: f64,
    /// Sun mean anomaly M
    m: f64,
    /// Moon mean anomaly M'
    mp: f64,
    /// Argument of latitude F
    f: f64,
}

fn lunar_arguments(t: f64) -> LunarArguments {
    LunarArguments {
        lp: between_0_360(
            218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t
                + t * t * t / 538_841.0
                - t * t * t * t / 65_194_000.0,
        ),
        d: between_0_360(
            297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t
                + t * t * t / 545_868.0
                - t * t * t * t / 113_065_000.0,
        ),
        m: between_0_360(
            357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t
                + t * t * t / 24_490_000.0,
        ),
        mp: between_0_360(
            134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t
                + t * t * t / 69_699.0
                - t * t * t * t / 14_712_000.0,
        ),
        f: between_0_360(
            93.272_095_0 + 483_202.017_523_3 * t
                - 0.003_653_9 * t * t
                - t * t * t / 3_526_000.0
                + t * t * t * t / 863_310_000.0,
        ),
    }
}

/// Ecliptic longitude (deg), latitude (deg) and distance (km) of the Moon.
pub fn moon_ecliptic(t: f64) -> (f64, f64, f64) {
    let args = lunar_arguments(t);
    // Earth orbit eccentricity correction, applied as E^|m| to each term
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for (d, m, mp, f, coeff_l, coeff_r) in &MOON_LR {
        let arg = (d * args.d + m * args.m + mp * args.mp + f * args.f).to_radians();
        let e_factor = e.powi(m.abs() as i32);
        sum_l += coeff_l * e_factor * arg.sin();
        sum_r += coeff_r * e_factor * arg.cos();
    }

    let mut sum_b = 0.0;
    for (d, m, mp, f, coeff_b) in &MOON_B {
        let arg = (d * args.d + m * args.m + mp * args.mp + f * args.f).to_radians();
        let e_factor = e.powi(m.abs() as i32);
        sum_b += coeff_b * e_factor * arg.sin();
    }

    // Additive corrections: Venus, Jupiter and the flattening of the Earth
    let a1 = between_0_360(119.75 + 131.849 * t).to_radians();
    let a2 = between_0_360(53.09 + 479_264.290 * t).to_radians();
    let a3 = between_0_360(313.45 + 481_266.484 * t).to_radians();
    let lp_rad = args.lp.to_radians();
    let mp_rad = args.mp.to_radians();
    let f_rad = args.f.to_radians();

    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lp_rad - f_rad).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp_rad.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f_rad).sin()
        + 175.0 * (a1 + f_rad).sin()
        + 127.0 * (lp_rad - mp_rad).sin()
        - 115.0 * (lp_rad + mp_rad).sin();

    let longitude = between_0_360(args.lp + sum_l * 1e-6);
    let latitude = sum_b * 1e-6;
    let distance_km = 385_000.56 + sum_r * 1e-3;
    (longitude, latitude, distance_km)
}

/// Apparent ecliptic longitude (deg) and distance (km) of the Sun (Ch. 25).
pub fn sun_ecliptic(t: f64) -> (f64, f64) {
    // Geometric mean longitude and mean anomaly
    let l0 = between_0_360(280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t);
    let m = between_0_360(357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t);
    let m_rad = m.to_radians();

    // Equation of center
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m_rad.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m_rad).sin()
        + 0.000_289 * (3.0 * m_rad).sin();

    let true_longitude = l0 + c;

    // Apparent longitude: nutation and aberration through the Ω term
    let omega = (125.04 - 1_934.136 * t).to_radians();
    let apparent_longitude = true_longitude - 0.005_69 - 0.004_78 * omega.sin();

    // Radius vector from the eccentricity and true anomaly
    let ecc = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;
    let true_anomaly = (m + c).to_radians();
    let radius_au = 1.000_001_018 * (1.0 - ecc * ecc) / (1.0 + ecc * true_anomaly.cos());

    (between_0_360(apparent_longitude), radius_au * AU_KM)
}

/// Rotates ecliptic spherical coordinates to an equatorial vector by the mean
/// obliquity.
fn ecliptic_to_equatorial(longitude_deg: f64, latitude_deg: f64, r_km: f64, t: f64) -> Vector3 {
    let lambda = longitude_deg.to_radians();
    let beta = latitude_deg.to_radians();
    let eps = mean_obliquity(t);
    let (sin_lambda, cos_lambda) = lambda.sin_cos();
    let (sin_beta, cos_beta) = beta.sin_cos();
    let (sin_eps, cos_eps) = eps.sin_cos();
    Vector3::new(
        r_km * cos_beta * cos_lambda,
        r_km * (cos_beta * sin_lambda * cos_eps - sin_beta * sin_eps),
        r_km * (cos_beta * sin_lambda * sin_eps + sin_beta * cos_eps),
    )
}

/// Geocentric equatorial (~GCRS) position of the Moon in km.
pub fn moon_gcrs_km(jd_tt: f64) -> Vector3 {
    let t = julian_centuries(jd_tt);
    let (longitude, latitude, distance_km) = moon_ecliptic(t);
    ecliptic_to_equatorial(longitude, latitude, distance_km, t)
}

/// Geocentric equatorial (~GCRS) position of the Sun in km.
pub fn sun_gcrs_km(jd_tt: f64) -> Vector3 {
    let t = julian_centuries(jd_tt);
    let (longitude, distance_km) = sun_ecliptic(t);
    ecliptic_to_equatorial(longitude, 0.0, distance_km, t)
}

#[cfg(test)]
mod ut_meeus {
    use super::*;
    use crate::constants::J2000_JD;

    /// Meeus example 47.a: 1992 April 12 at 0h TT.
    #[test]
    fn meeus_example_47a() {
        let jd = 2_448_724.5;
        let t = julian_centuries(jd);
        let (longitude, latitude, distance_km) = moon_ecliptic(t);
        // Published: lambda = 133.162655 deg, beta = -3.229126 deg,
        // Delta = 368409.7 km. The truncated series strays by a few
        // hundredths of a degree.
        assert!((longitude - 133.162_655).abs() < 0.02, "lambda {longitude}");
        assert!((latitude - -3.229_126).abs() < 0.02, "beta {latitude}");
        assert!((distance_km - 368_409.7).abs() < 200.0, "delta {distance_km}");
    }

    /// Meeus example 25.a: 1992 October 13 at 0h TT.
    #[test]
    fn meeus_example_25a() {
        let jd = 2_448_908.5;
        let t = julian_centuries(jd);
        let (longitude, distance_km) = sun_ecliptic(t);
        // Published: apparent longitude 199.90895 deg (low-accuracy method ~0.01 deg),
        // R = 0.99766 AU
        assert!((longitude - 199.909).abs() < 0.01, "lambda {longitude}");
        assert!((distance_km / AU_KM - 0.997_66).abs() < 1e-4);
    }

    #[test]
    fn moon_distance_range() {
        // Scan three months in 2025: the distance stays within the
        // perigee/apogee envelope
        for i in 0..90 {
            let jd = J2000_JD + 9_204.0 + i as f64;
            let (_, _, distance_km) = moon_ecliptic(julian_centuries(jd));
            assert!((356_000.0..407_000.0).contains(&distance_km), "{distance_km}");
        }
    }

    #[test]
    fn moon_latitude_bounded() {
        for i in 0..1_000 {
            let jd = J2000_JD + i as f64 * 3.3;
            let (_, latitude, _) = moon_ecliptic(julian_centuries(jd));
            assert!(latitude.abs() < 5.6, "latitude {latitude}");
        }
    }
}
