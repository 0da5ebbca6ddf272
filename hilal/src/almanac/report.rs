/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;

use hifitime::Epoch;

use crate::bodies::{EphemerisSource, Illumination};
use crate::observer::Observer;
use crate::visibility::{CrescentGeometry, OdehResult, YallopResult};

/// Topocentric place of the Moon, refraction applied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoonPosition {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    /// Topocentric distance in kilometers.
    pub distance_km: f64,
}

impl fmt::Display for MoonPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "az.: {:.2} deg    alt.: {:.2} deg    distance: {:.0} km",
            self.azimuth_deg, self.altitude_deg, self.distance_km
        )
    }
}

/// The full crescent sighting assessment for one date and observer.
///
/// When sunset or moonset is absent (polar conditions, or the Moon setting
/// before the Sun), every geometry and scoring field is `None` and
/// `sighting_possible` is false; `ephemeris_source` is always reported.
#[derive(Clone, Debug, PartialEq)]
pub struct MoonSightingReport {
    /// UTC midnight of the civil date assessed.
    pub date: Epoch,
    pub observer: Observer,
    pub ephemeris_source: EphemerisSource,
    pub sunset: Option<Epoch>,
    pub moonset: Option<Epoch>,
    /// The canonical post-sunset observation time.
    pub best_time: Option<Epoch>,
    /// ±20 minutes around the best time.
    pub observation_window: Option<(Epoch, Epoch)>,
    pub geometry: Option<CrescentGeometry>,
    pub yallop: Option<YallopResult>,
    pub odeh: Option<OdehResult>,
    /// Moon azimuth/altitude at best time, refraction applied.
    pub moon_position: Option<MoonPosition>,
    pub illumination: Option<Illumination>,
    pub sighting_possible: bool,
    /// One human-readable line derived from the Odeh zone.
    pub guidance: Option<String>,
}

/// Lunar phase names over one synodic cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewMoon => "new-moon",
            Self::WaxingCrescent => "waxing-crescent",
            Self::FirstQuarter => "first-quarter",
            Self::WaxingGibbous => "waxing-gibbous",
            Self::FullMoon => "full-moon",
            Self::WaningGibbous => "waning-gibbous",
            Self::LastQuarter => "last-quarter",
            Self::WaningCrescent => "waning-crescent",
        };
        write!(f, "{name}")
    }
}

/// Kernel-free lunar phase summary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoonPhaseResult {
    pub date: Epoch,
    /// Fraction of the synodic cycle elapsed since new moon, in [0, 1).
    pub phase_fraction: f64,
    pub phase_name: PhaseName,
    /// Days since the previous new moon.
    pub age_days: f64,
    /// Illuminated fraction of the disk, in [0, 1].
    pub illumination_fraction: f64,
    pub elongation_deg: f64,
    pub is_waxing: bool,
    pub previous_new_moon: Epoch,
    pub next_new_moon: Epoch,
    pub next_full_moon: Epoch,
}

/// Kernel-free illumination summary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoonIlluminationResult {
    pub date: Epoch,
    pub illumination: Illumination,
}
