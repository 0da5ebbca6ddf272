/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod meeus;
pub mod phases;

use core::fmt;

use crate::constants::naif_ids::{EARTH, MOON, SUN};
use crate::constants::MOON_RADIUS_KM;
use crate::errors::MathError;
use crate::math::{angle_between, Vector3};
use crate::naif::spk::{EphemerisError, SPK};
use crate::time::jd_tt_to_et;

/// Where the Moon and Sun positions come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EphemerisSource {
    /// Chebyshev evaluation of a loaded DE442S SPK kernel.
    De442s,
    /// The truncated Meeus series; no kernel required.
    Meeus,
}

impl fmt::Display for EphemerisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::De442s => write!(f, "DE442S"),
            Self::Meeus => write!(f, "Meeus approximation"),
        }
    }
}

/// The seam between the kernel-backed and kernel-free operating modes: both
/// provide geocentric GCRS positions for the Moon and the Sun, in km, and the
/// downstream frames/observer/visibility code is shared.
pub trait EphemerisProvider {
    /// Geocentric GCRS positions `(moon_km, sun_km)` at the TT Julian date.
    fn provide(&self, jd_tt: f64) -> Result<(Vector3, Vector3), EphemerisError>;

    fn source(&self) -> EphemerisSource;
}

/// Kernel-backed provider reading DE442S states.
pub struct SpkProvider<'a> {
    pub spk: &'a SPK,
}

impl EphemerisProvider for SpkProvider<'_> {
    fn provide(&self, jd_tt: f64) -> Result<(Vector3, Vector3), EphemerisError> {
        let et = jd_tt_to_et(jd_tt);
        let moon = self.spk.state(MOON, EARTH, et)?;
        let sun = self.spk.state(SUN, EARTH, et)?;
        Ok((moon.position_km, sun.position_km))
    }

    fn source(&self) -> EphemerisSource {
        EphemerisSource::De442s
    }
}

/// Kernel-free provider using the Meeus truncated series. Never fails.
#[derive(Default, Clone, Copy, Debug)]
pub struct MeeusProvider;

impl EphemerisProvider for MeeusProvider {
    fn provide(&self, jd_tt: f64) -> Result<(Vector3, Vector3), EphemerisError> {
        Ok((meeus::moon_gcrs_km(jd_tt), meeus::sun_gcrs_km(jd_tt)))
    }

    fn source(&self) -> EphemerisSource {
        EphemerisSource::Meeus
    }
}

/// Geometry of the sunlit lunar disk as seen from the geocenter.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Illumination {
    /// Sun-Moon elongation ψ in degrees, in [0, 180].
    pub elongation_deg: f64,
    /// Phase angle i (Earth-Sun angle at the Moon) in degrees.
    pub phase_angle_deg: f64,
    /// Illuminated fraction of the disk, `(1 + cos i) / 2`.
    pub fraction: f64,
    /// True between new and full moon (Moon east of the Sun).
    pub is_waxing: bool,
    /// Position angle of the bright limb, degrees east of celestial north.
    pub bright_limb_angle_deg: f64,
}

/// Illumination quantities from geocentric Moon and Sun vectors (km).
pub fn illumination(moon: &Vector3, sun: &Vector3) -> Result<Illumination, MathError> {
    let elongation = angle_between(moon, sun)?;

    // Phase angle at the Moon, between the directions to the Earth and Sun
    let moon_to_earth = -moon;
    let moon_to_sun = sun - moon;
    let phase_angle = angle_between(&moon_to_earth, &moon_to_sun)?;

    let fraction = (1.0 + phase_angle.cos()) / 2.0;
    let is_waxing = sun.cross(moon)[2] > 0.0;

    // Meeus eq. 48.5: position angle of the bright limb from the equatorial
    // coordinates of both bodies
    let (alpha_m, delta_m) = right_ascension_declination(moon);
    let (alpha_s, delta_s) = right_ascension_declination(sun);
    let d_alpha = alpha_s - alpha_m;
    let chi = (delta_s.cos() * d_alpha.sin())
        .atan2(delta_s.sin() * delta_m.cos() - delta_s.cos() * delta_m.sin() * d_alpha.cos());

    Ok(Illumination {
        elongation_deg: elongation.to_degrees(),
        phase_angle_deg: phase_angle.to_degrees(),
        fraction,
        is_waxing,
        bright_limb_angle_deg: crate::math::angles::between_0_360(chi.to_degrees()),
    })
}

/// Right ascension and declination (radians) of an equatorial vector.
fn right_ascension_declination(v: &Vector3) -> (f64, f64) {
    let alpha = v[1].atan2(v[0]);
    let delta = (v[2] / v.norm()).asin();
    (alpha, delta)
}

/// Topocentric crescent width in arc-minutes, from the observer-to-Moon
/// distance and the topocentric elongation ARCL in degrees.
pub fn crescent_width_arcmin(moon_topo_km: &Vector3, arcl_deg: f64) -> f64 {
    let semi_diameter_arcmin = (MOON_RADIUS_KM / moon_topo_km.norm()).atan().to_degrees() * 60.0;
    semi_diameter_arcmin * (1.0 - arcl_deg.to_radians().cos())
}
