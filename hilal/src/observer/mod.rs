/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod geodetic;
pub mod refraction;

use core::fmt;

use crate::frames::{gcrs_to_itrs, itrs_to_gcrs};
use crate::math::angles::between_0_360;
use crate::math::Vector3;
use crate::time::TimeScales;

pub use geodetic::{ecef_to_geodetic, enu_basis, geodetic_to_ecef};
pub use refraction::{apply_refraction, bennett_refraction_deg, remove_refraction};

/// A ground observer: WGS84 geodetic position, optional Earth-rotation
/// overrides, and the local atmosphere for refraction. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    /// Geodetic latitude in degrees, north positive.
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive.
    pub longitude_deg: f64,
    /// Height above the WGS84 ellipsoid, in meters.
    pub elevation_m: f64,
    /// Optional TT - UT1 override in seconds.
    pub delta_t: Option<f64>,
    /// Optional UT1 - UTC override in seconds (takes precedence over `delta_t`).
    pub ut1_utc: Option<f64>,
    /// Atmospheric pressure in millibars.
    pub pressure_mbar: f64,
    /// Air temperature in Celsius.
    pub temperature_c: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
            delta_t: None,
            ut1_utc: None,
            pressure_mbar: 1013.25,
            temperature_c: 15.0,
        }
    }

    pub fn with_delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = Some(delta_t);
        self
    }

    pub fn with_ut1_utc(mut self, ut1_utc: f64) -> Self {
        self.ut1_utc = Some(ut1_utc);
        self
    }

    pub fn with_atmosphere(mut self, pressure_mbar: f64, temperature_c: f64) -> Self {
        self.pressure_mbar = pressure_mbar;
        self.temperature_c = temperature_c;
        self
    }

    /// The observer's Earth-fixed position in kilometers.
    pub fn itrs_km(&self) -> Vector3 {
        geodetic_to_ecef(self.latitude_deg, self.longitude_deg, self.elevation_m) / 1_000.0
    }

    /// Azimuth and altitude of a body given its geocentric GCRS position in km.
    ///
    /// The pipeline: rotate the body into ITRS, subtract the observer's ITRS
    /// position, project the topocentric displacement on the local ENU basis,
    /// then convert to azimuth (clockwise from north) and altitude. Refraction
    /// is added unless `airless` is set.
    pub fn azimuth_altitude(
        &self,
        body_gcrs_km: &Vector3,
        ts: &TimeScales,
        airless: bool,
    ) -> AzAlt {
        let body_itrs = gcrs_to_itrs(body_gcrs_km, ts, 0.0, 0.0);
        let delta = body_itrs - self.itrs_km();

        let (east, north, up) = enu_basis(
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
        );
        let e = delta.dot(&east);
        let n = delta.dot(&north);
        let u = delta.dot(&up);

        let azimuth_deg = between_0_360(e.atan2(n).to_degrees());
        let mut altitude_deg = u.atan2((e * e + n * n).sqrt()).to_degrees();
        if !airless {
            altitude_deg = apply_refraction(altitude_deg, self.pressure_mbar, self.temperature_c);
        }

        AzAlt {
            azimuth_deg,
            altitude_deg,
            range_km: delta.norm(),
        }
    }

    /// The observer-to-body vector in GCRS axes, in kilometers. This is the
    /// topocentric direction used for ARCL and the crescent width.
    pub fn topocentric_gcrs(&self, body_gcrs_km: &Vector3, ts: &TimeScales) -> Vector3 {
        let observer_gcrs = itrs_to_gcrs(&self.itrs_km(), ts, 0.0, 0.0);
        body_gcrs_km - observer_gcrs
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observer at ({:.4} deg, {:.4} deg, {:.0} m)",
            self.latitude_deg, self.longitude_deg, self.elevation_m
        )
    }
}

/// Topocentric direction of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AzAlt {
    /// Degrees clockwise from true north, in [0, 360).
    pub azimuth_deg: f64,
    /// Degrees above the horizon, in [-90, 90].
    pub altitude_deg: f64,
    /// Topocentric distance in kilometers.
    pub range_km: f64,
}

impl fmt::Display for AzAlt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "az.: {:.4} deg    alt.: {:.4} deg    range: {:.1} km",
            self.azimuth_deg, self.altitude_deg, self.range_km
        )
    }
}
