/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The facade composing the whole sighting pipeline: time scales to ephemeris
//! to frames, observer, events and visibility.

mod report;

pub use report::{
    MoonIlluminationResult, MoonPhaseResult, MoonPosition, MoonSightingReport, PhaseName,
};

use bytes::Bytes;
use hifitime::Epoch;
use log::info;
use snafu::ResultExt;

use crate::bodies::{
    crescent_width_arcmin, illumination, meeus, phases, EphemerisProvider, EphemerisSource,
    MeeusProvider, SpkProvider,
};
use crate::errors::{AlmanacResult, EphemerisSnafu, MathSnafu};
use crate::events::{
    best_time_heuristic, best_time_optimized, observation_window, sun_moon_events, SunMoonEvents,
};
use crate::math::angle_between;
use crate::naif::spk::SPK;
use crate::observer::Observer;
use crate::time::{epoch_to_jd_utc, jd_to_epoch, LeapSecondTable, TimeScales};
use crate::visibility::{CrescentGeometry, OdehResult, OdehZone, YallopResult};

/// How the best observation time is chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BestTimeMethod {
    /// Sunset plus 4/9 of the lag.
    #[default]
    Heuristic,
    /// Argmax of the Odeh V score between sunset and moonset.
    Optimized,
}

/// Options of a sighting query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SightingOptions {
    pub best_time_method: BestTimeMethod,
}

/// Identifies where kernel bytes came from. `auto` resolution is a front-end
/// concern and never reaches this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelSource {
    File(String),
    Buffer,
    Url(String),
}

impl core::fmt::Display for KernelSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {path}"),
            Self::Buffer => write!(f, "caller-provided buffer"),
            Self::Url(url) => write!(f, "download from {url}"),
        }
    }
}

/// The facade. Holds the optional SPK kernel (immutable, shared read-only by
/// every query) and the leap second table. Replacing the kernel means building
/// a new `Almanac`; queries in flight keep the old one.
#[derive(Clone, Debug, Default)]
pub struct Almanac {
    spk: Option<SPK>,
    kernel_source: Option<KernelSource>,
    pub leap_seconds: LeapSecondTable,
}

impl Almanac {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the provided bytes as the active DE442S kernel.
    pub fn with_kernel(self, bytes: Bytes) -> AlmanacResult<Self> {
        self.with_kernel_from(bytes, KernelSource::Buffer)
    }

    /// Loads kernel bytes and records where they came from.
    pub fn with_kernel_from(mut self, bytes: Bytes, source: KernelSource) -> AlmanacResult<Self> {
        let spk = SPK::parse(bytes).context(EphemerisSnafu {
            action: "initializing the kernel",
        })?;
        info!("loaded SPK with {} segments from {source}", spk.segments().len());
        self.spk = Some(spk);
        self.kernel_source = Some(source);
        Ok(self)
    }

    /// Where the active kernel's bytes came from, if one is loaded.
    pub fn kernel_source(&self) -> Option<&KernelSource> {
        self.kernel_source.as_ref()
    }

    /// Reads a kernel file from disk onto the heap and loads it.
    pub fn load_kernel(self, path: &str) -> AlmanacResult<Self> {
        use crate::errors::LoadingSnafu;
        use crate::file2heap;
        use std::fs::File;

        let bytes = file2heap!(path).context(LoadingSnafu {
            path: path.to_string(),
        })?;
        self.with_kernel_from(bytes, KernelSource::File(path.to_string()))
    }

    /// Supplements the leap second table from a NAIF LSK text kernel.
    pub fn with_lsk(mut self, lsk_text: &str) -> Self {
        self.leap_seconds.merge_lsk(lsk_text);
        self
    }

    pub fn has_kernel(&self) -> bool {
        self.spk.is_some()
    }

    /// The ephemeris source a sighting query would use.
    pub fn ephemeris_source(&self) -> EphemerisSource {
        if self.spk.is_some() {
            EphemerisSource::De442s
        } else {
            EphemerisSource::Meeus
        }
    }

    /// Sun and Moon rise/set/twilight events for the civil date containing
    /// `date`, kernel-backed when available.
    pub fn sun_moon_events(&self, date: Epoch, observer: &Observer) -> AlmanacResult<SunMoonEvents> {
        let midnight = floor_to_midnight_utc(date);
        match &self.spk {
            Some(spk) => sun_moon_events(
                &SpkProvider { spk },
                observer,
                &self.leap_seconds,
                midnight,
            ),
            None => sun_moon_events(&MeeusProvider, observer, &self.leap_seconds, midnight),
        }
    }

    /// The full crescent sighting report for the civil date containing `date`.
    ///
    /// Astronomical absences (no sunset, no moonset, Moon down before the Sun)
    /// produce a partial report with `sighting_possible = false`; only kernel
    /// and math failures surface as errors.
    pub fn sighting_report(
        &self,
        date: Epoch,
        observer: &Observer,
        options: SightingOptions,
    ) -> AlmanacResult<MoonSightingReport> {
        match &self.spk {
            Some(spk) => {
                self.sighting_with_provider(&SpkProvider { spk }, date, observer, options)
            }
            None => self.sighting_with_provider(&MeeusProvider, date, observer, options),
        }
    }

    /// The sighting pipeline over the kernel-free Meeus provider, regardless
    /// of any loaded kernel. Never fails for lack of a kernel.
    pub fn moon_visibility_estimate(
        &self,
        date: Epoch,
        latitude_deg: f64,
        longitude_deg: f64,
    ) -> AlmanacResult<MoonSightingReport> {
        let observer = Observer::new(latitude_deg, longitude_deg, 0.0);
        self.sighting_with_provider(&MeeusProvider, date, &observer, SightingOptions::default())
    }

    fn sighting_with_provider<P: EphemerisProvider>(
        &self,
        provider: &P,
        date: Epoch,
        observer: &Observer,
        options: SightingOptions,
    ) -> AlmanacResult<MoonSightingReport> {
        let midnight = floor_to_midnight_utc(date);
        let events = sun_moon_events(provider, observer, &self.leap_seconds, midnight)?;

        let mut report = MoonSightingReport {
            date: midnight,
            observer: *observer,
            ephemeris_source: provider.source(),
            sunset: events.sunset,
            moonset: events.moonset,
            best_time: None,
            observation_window: None,
            geometry: None,
            yallop: None,
            odeh: None,
            moon_position: None,
            illumination: None,
            sighting_possible: false,
            guidance: None,
        };

        let (Some(sunset), Some(moonset)) = (events.sunset, events.moonset) else {
            return Ok(report);
        };

        let best_time = match options.best_time_method {
            BestTimeMethod::Heuristic => best_time_heuristic(sunset, moonset),
            BestTimeMethod::Optimized => {
                best_time_optimized(provider, observer, &self.leap_seconds, sunset, moonset)?
            }
        };
        let Some(best_time) = best_time else {
            // Moonset precedes sunset: no crescent window tonight
            return Ok(report);
        };

        // Single evaluation of the whole geometry at best time
        let ts = TimeScales::compute(
            best_time,
            &self.leap_seconds,
            observer.delta_t,
            observer.ut1_utc,
        );
        let (moon, sun) = provider.provide(ts.jd_tt).context(EphemerisSnafu {
            action: "evaluating the ephemeris at best time",
        })?;

        let moon_airless = observer.azimuth_altitude(&moon, &ts, true);
        let sun_airless = observer.azimuth_altitude(&sun, &ts, true);
        let moon_apparent = observer.azimuth_altitude(&moon, &ts, false);

        let moon_topo = observer.topocentric_gcrs(&moon, &ts);
        let sun_topo = observer.topocentric_gcrs(&sun, &ts);
        let arcl_deg = angle_between(&moon_topo, &sun_topo)
            .context(MathSnafu {
                action: "computing ARCL",
            })?
            .to_degrees();

        let geometry = CrescentGeometry::new(
            arcl_deg,
            moon_airless.altitude_deg - sun_airless.altitude_deg,
            sun_airless.azimuth_deg - moon_airless.azimuth_deg,
            crescent_width_arcmin(&moon_topo, arcl_deg),
            (moonset - sunset).to_seconds() / 60.0,
        );

        let yallop = YallopResult::compute(geometry.arcv_deg, geometry.width_arcmin);
        let odeh = OdehResult::compute(geometry.arcv_deg, geometry.width_arcmin);

        report.best_time = Some(best_time);
        report.observation_window = Some(observation_window(best_time));
        report.moon_position = Some(MoonPosition {
            azimuth_deg: moon_apparent.azimuth_deg,
            altitude_deg: moon_apparent.altitude_deg,
            distance_km: moon_topo.norm(),
        });
        report.illumination = Some(illumination(&moon, &sun).context(MathSnafu {
            action: "computing the illumination at best time",
        })?);
        report.guidance = Some(guidance_text(&odeh));
        report.geometry = Some(geometry);
        report.yallop = Some(yallop);
        report.odeh = Some(odeh);
        report.sighting_possible = true;

        Ok(report)
    }

    /// Kernel-free lunar phase for the provided instant.
    pub fn moon_phase(&self, date: Epoch) -> MoonPhaseResult {
        let ts = TimeScales::compute(date, &self.leap_seconds, None, None);
        let moon = meeus::moon_gcrs_km(ts.jd_tt);
        let sun = meeus::sun_gcrs_km(ts.jd_tt);
        // Meeus vectors are never zero, so the fallback is unreachable
        let illum = illumination(&moon, &sun).unwrap_or_default();

        let prev_new = phases::previous_new_moon(ts.jd_tt);
        let next_new = phases::next_new_moon(ts.jd_tt);
        let next_full = phases::next_full_moon(ts.jd_tt);
        let age_days = ts.jd_tt - prev_new;
        let cycle = next_new - prev_new;
        let phase_fraction = (age_days / cycle).clamp(0.0, 1.0 - f64::EPSILON);

        MoonPhaseResult {
            date,
            phase_fraction,
            phase_name: phase_name_from_fraction(phase_fraction),
            age_days,
            illumination_fraction: illum.fraction,
            elongation_deg: illum.elongation_deg,
            is_waxing: illum.is_waxing,
            previous_new_moon: jd_to_epoch(prev_new - tt_offset_days(ts)),
            next_new_moon: jd_to_epoch(next_new - tt_offset_days(ts)),
            next_full_moon: jd_to_epoch(next_full - tt_offset_days(ts)),
        }
    }

    /// Kernel-free topocentric Moon position, refraction applied.
    pub fn moon_position(
        &self,
        date: Epoch,
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_m: f64,
    ) -> MoonPosition {
        let observer = Observer::new(latitude_deg, longitude_deg, elevation_m);
        let ts = TimeScales::compute(date, &self.leap_seconds, None, None);
        let moon = meeus::moon_gcrs_km(ts.jd_tt);
        let azalt = observer.azimuth_altitude(&moon, &ts, false);
        MoonPosition {
            azimuth_deg: azalt.azimuth_deg,
            altitude_deg: azalt.altitude_deg,
            distance_km: azalt.range_km,
        }
    }

    /// Kernel-free illumination for the provided instant.
    pub fn moon_illumination(&self, date: Epoch) -> MoonIlluminationResult {
        let ts = TimeScales::compute(date, &self.leap_seconds, None, None);
        let moon = meeus::moon_gcrs_km(ts.jd_tt);
        let sun = meeus::sun_gcrs_km(ts.jd_tt);
        MoonIlluminationResult {
            date,
            illumination: illumination(&moon, &sun).unwrap_or_default(),
        }
    }
}

/// TT-UTC in days at this instant, for converting phase JDEs (TT) to UTC epochs.
fn tt_offset_days(ts: TimeScales) -> f64 {
    ts.jd_tt - ts.jd_utc
}

/// UTC midnight of the civil date containing `date`.
fn floor_to_midnight_utc(date: Epoch) -> Epoch {
    let jd_utc = epoch_to_jd_utc(date);
    // Julian dates roll at noon; shift by half a day to floor at midnight
    let midnight_jd = (jd_utc + 0.5).floor() - 0.5;
    jd_to_epoch(midnight_jd)
}

fn phase_name_from_fraction(fraction: f64) -> PhaseName {
    // Eight bins centered on the principal phases: new moon owns the last and
    // first sixteenth of the cycle, full moon the band around 0.5
    match (((fraction + 1.0 / 16.0) * 8.0) as usize) % 8 {
        0 => PhaseName::NewMoon,
        1 => PhaseName::WaxingCrescent,
        2 => PhaseName::FirstQuarter,
        3 => PhaseName::WaxingGibbous,
        4 => PhaseName::FullMoon,
        5 => PhaseName::WaningGibbous,
        6 => PhaseName::LastQuarter,
        _ => PhaseName::WaningCrescent,
    }
}

fn guidance_text(odeh: &OdehResult) -> String {
    let zone = odeh.zone;
    match zone {
        OdehZone::A => format!(
            "Zone {zone}: {}; an easy sighting shortly after sunset.",
            zone.description()
        ),
        OdehZone::B | OdehZone::C => format!(
            "Zone {zone}: {}; start scanning near the best time.",
            zone.description()
        ),
        OdehZone::D => format!("Zone {zone}: {}; try again tomorrow.", zone.description()),
    }
}

#[cfg(test)]
mod ut_almanac {
    use super::*;

    #[test]
    fn midnight_flooring() {
        let late = Epoch::from_gregorian_utc_hms(2025, 3, 29, 23, 59, 59);
        let early = Epoch::from_gregorian_utc_hms(2025, 3, 29, 0, 0, 1);
        let midnight = Epoch::from_gregorian_utc_at_midnight(2025, 3, 29);
        assert!((floor_to_midnight_utc(late) - midnight).to_seconds().abs() < 1e-3);
        assert!((floor_to_midnight_utc(early) - midnight).to_seconds().abs() < 1e-3);
    }

    #[test]
    fn phase_name_bins() {
        assert_eq!(phase_name_from_fraction(0.01), PhaseName::NewMoon);
        assert_eq!(phase_name_from_fraction(0.15), PhaseName::WaxingCrescent);
        assert_eq!(phase_name_from_fraction(0.25), PhaseName::FirstQuarter);
        assert_eq!(phase_name_from_fraction(0.5), PhaseName::FullMoon);
        assert_eq!(phase_name_from_fraction(0.75), PhaseName::LastQuarter);
        assert_eq!(phase_name_from_fraction(0.93), PhaseName::WaningCrescent);
        assert_eq!(phase_name_from_fraction(0.99), PhaseName::NewMoon);
    }
}
