/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::constants::wgs84;
use crate::math::Vector3;

/// Prime-vertical radius of curvature N(φ) in meters.
fn prime_vertical_radius(lat_rad: f64) -> f64 {
    let sin_lat = lat_rad.sin();
    wgs84::SEMI_MAJOR_AXIS_M / (1.0 - wgs84::eccentricity_sq() * sin_lat * sin_lat).sqrt()
}

/// WGS84 geodetic coordinates to Earth-centered Earth-fixed, in meters.
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, height_m: f64) -> Vector3 {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let n = prime_vertical_radius(lat);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(
        (n + height_m) * cos_lat * cos_lon,
        (n + height_m) * cos_lat * sin_lon,
        (n * (1.0 - wgs84::eccentricity_sq()) + height_m) * sin_lat,
    )
}

/// ECEF (meters) back to geodetic `(lat_deg, lon_deg, height_m)` by Bowring
/// iteration. Four rounds converge to well below a millimeter for |φ| < 89.9°.
pub fn ecef_to_geodetic(ecef_m: &Vector3) -> (f64, f64, f64) {
    let e2 = wgs84::eccentricity_sq();
    let p = (ecef_m[0] * ecef_m[0] + ecef_m[1] * ecef_m[1]).sqrt();
    let lon = ecef_m[1].atan2(ecef_m[0]);

    let mut lat = ecef_m[2].atan2(p * (1.0 - e2));
    for _ in 0..4 {
        let n = prime_vertical_radius(lat);
        lat = (ecef_m[2] + e2 * n * lat.sin()).atan2(p);
    }

    let n = prime_vertical_radius(lat);
    let height = if lat.cos().abs() > 1e-10 {
        p / lat.cos() - n
    } else {
        ecef_m[2].abs() - n * (1.0 - e2)
    };

    (lat.to_degrees(), lon.to_degrees(), height)
}

/// The local east, north and up unit vectors at the provided geodetic position.
pub fn enu_basis(lat_rad: f64, lon_rad: f64) -> (Vector3, Vector3, Vector3) {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    let east = Vector3::new(-sin_lon, cos_lon, 0.0);
    let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
    (east, north, up)
}
