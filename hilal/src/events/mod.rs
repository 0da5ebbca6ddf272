/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Altitude-threshold crossings of the Sun and the Moon: rise, set, and the
//! twilight ends, searched over a 28-hour window from UTC midnight.

use core::fmt;

use hifitime::Epoch;
use log::debug;

use crate::bodies::EphemerisProvider;
use crate::constants::{
    ASTRONOMICAL_TWILIGHT_DEG, CIVIL_TWILIGHT_DEG, NAUTICAL_TWILIGHT_DEG, RISE_SET_ALTITUDE_DEG,
};
use crate::errors::{AlmanacError, EphemerisSnafu};
use crate::math::roots::brent;
use crate::observer::Observer;
use crate::time::{LeapSecondTable, TimeScales};
use crate::visibility::arcv_min;
use snafu::ResultExt;

/// Search window: 28 hours from UTC midnight, so that a moonset in the small
/// hours of the next day is still attributed to this civil date.
const WINDOW_S: f64 = 28.0 * 3_600.0;

/// Coarse sampling step of the altitude functions, in seconds.
const STEP_S: f64 = 600.0;

/// Brent refinement tolerance, in seconds.
const EVENT_TOL_S: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Body {
    Sun,
    Moon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Rising,
    Setting,
}

/// Rise, set and twilight instants for one civil date and observer. A `None`
/// field is an expected absence (circumpolar or never-rising conditions), not
/// an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SunMoonEvents {
    /// UTC midnight opening the search window.
    pub date: Epoch,
    pub sunrise: Option<Epoch>,
    pub sunset: Option<Epoch>,
    pub moonrise: Option<Epoch>,
    pub moonset: Option<Epoch>,
    pub civil_twilight_end: Option<Epoch>,
    pub nautical_twilight_end: Option<Epoch>,
    pub astronomical_twilight_end: Option<Epoch>,
}

impl fmt::Display for SunMoonEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(e: &Option<Epoch>) -> String {
            e.map_or_else(|| "none".to_string(), |e| format!("{e}"))
        }
        write!(
            f,
            "sunrise: {}, sunset: {}, moonrise: {}, moonset: {}",
            opt(&self.sunrise),
            opt(&self.sunset),
            opt(&self.moonrise),
            opt(&self.moonset)
        )
    }
}

/// Computes every Sun/Moon event for the window opening at `midnight_utc`.
pub fn sun_moon_events<P: EphemerisProvider>(
    provider: &P,
    observer: &Observer,
    table: &LeapSecondTable,
    midnight_utc: Epoch,
) -> Result<SunMoonEvents, AlmanacError> {
    let ts0 = TimeScales::compute(midnight_utc, table, observer.delta_t, observer.ut1_utc);
    let et_start = ts0.et();

    // Airless altitude of one body at an ET instant
    let altitude = |body: Body, et: f64| -> Result<f64, AlmanacError> {
        let ts = TimeScales::from_et_approx(et, table, observer.delta_t, observer.ut1_utc);
        let (moon, sun) = provider.provide(ts.jd_tt).context(EphemerisSnafu {
            action: "sampling altitudes for event search",
        })?;
        let gcrs = match body {
            Body::Sun => sun,
            Body::Moon => moon,
        };
        Ok(observer.azimuth_altitude(&gcrs, &ts, true).altitude_deg)
    };

    // Sample both altitude curves once; every event search scans these.
    let n_samples = (WINDOW_S / STEP_S) as usize + 1;
    let mut sun_alt = Vec::with_capacity(n_samples);
    let mut moon_alt = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let et = et_start + i as f64 * STEP_S;
        sun_alt.push(altitude(Body::Sun, et)?);
        moon_alt.push(altitude(Body::Moon, et)?);
    }

    let find = |body: Body, threshold: f64, direction: Direction| -> Result<Option<Epoch>, AlmanacError> {
        let samples = match body {
            Body::Sun => &sun_alt,
            Body::Moon => &moon_alt,
        };
        for i in 1..n_samples {
            let y0 = samples[i - 1] - threshold;
            let y1 = samples[i] - threshold;
            let crosses = match direction {
                Direction::Rising => y0 < 0.0 && y1 >= 0.0,
                Direction::Setting => y0 > 0.0 && y1 <= 0.0,
            };
            if !crosses {
                continue;
            }
            let a = et_start + (i - 1) as f64 * STEP_S;
            let b = et_start + i as f64 * STEP_S;
            // Provider errors were already surfaced while sampling; inside the
            // refinement the closure maps them to NaN, which Brent treats as
            // an unbracketed interval.
            let f = |et: f64| altitude(body, et).map_or(f64::NAN, |alt| alt - threshold);
            let Some(root_et) = brent(f, a, b, EVENT_TOL_S) else {
                continue;
            };
            let ts = TimeScales::from_et_approx(root_et, table, observer.delta_t, observer.ut1_utc);
            debug!("{body:?} {direction:?} through {threshold} deg at {}", ts.epoch);
            return Ok(Some(ts.epoch));
        }
        Ok(None)
    };

    Ok(SunMoonEvents {
        date: midnight_utc,
        sunrise: find(Body::Sun, RISE_SET_ALTITUDE_DEG, Direction::Rising)?,
        sunset: find(Body::Sun, RISE_SET_ALTITUDE_DEG, Direction::Setting)?,
        moonrise: find(Body::Moon, RISE_SET_ALTITUDE_DEG, Direction::Rising)?,
        moonset: find(Body::Moon, RISE_SET_ALTITUDE_DEG, Direction::Setting)?,
        civil_twilight_end: find(Body::Sun, CIVIL_TWILIGHT_DEG, Direction::Setting)?,
        nautical_twilight_end: find(Body::Sun, NAUTICAL_TWILIGHT_DEG, Direction::Setting)?,
        astronomical_twilight_end: find(Body::Sun, ASTRONOMICAL_TWILIGHT_DEG, Direction::Setting)?,
    })
}

/// The classical best observation time: sunset plus 4/9 of the lag. `None`
/// when the Moon sets before the Sun.
pub fn best_time_heuristic(sunset: Epoch, moonset: Epoch) -> Option<Epoch> {
    if moonset > sunset {
        Some(sunset + (moonset - sunset) * (4.0 / 9.0))
    } else {
        None
    }
}

/// The best observation time by maximizing the Odeh V score over 91 samples
/// of `[sunset, moonset]`.
///
/// The observer's Earth-fixed position is constant across the scan; only the
/// Earth-rotation dependent quantities are recomputed per step.
pub fn best_time_optimized<P: EphemerisProvider>(
    provider: &P,
    observer: &Observer,
    table: &LeapSecondTable,
    sunset: Epoch,
    moonset: Epoch,
) -> Result<Option<Epoch>, AlmanacError> {
    if moonset <= sunset {
        return Ok(None);
    }

    let span_s = (moonset - sunset).to_seconds();
    let mut best: Option<(f64, Epoch)> = None;

    for i in 0..91 {
        let epoch = sunset + (span_s * i as f64 / 90.0) * hifitime::Unit::Second;
        let ts = TimeScales::compute(epoch, table, observer.delta_t, observer.ut1_utc);
        let (moon, sun) = provider.provide(ts.jd_tt).context(EphemerisSnafu {
            action: "scanning for the optimized best time",
        })?;

        let moon_aa = observer.azimuth_altitude(&moon, &ts, true);
        let sun_aa = observer.azimuth_altitude(&sun, &ts, true);
        let arcv = moon_aa.altitude_deg - sun_aa.altitude_deg;

        let moon_topo = observer.topocentric_gcrs(&moon, &ts);
        let sun_topo = observer.topocentric_gcrs(&sun, &ts);
        let arcl = crate::math::angle_between(&moon_topo, &sun_topo)
            .map(|r| r.to_degrees())
            .unwrap_or(0.0);
        let width = crate::bodies::crescent_width_arcmin(&moon_topo, arcl);

        let v = arcv - arcv_min(width);
        if best.map_or(true, |(best_v, _)| v > best_v) {
            best = Some((v, epoch));
        }
    }

    Ok(best.map(|(_, epoch)| epoch))
}

/// The ±20 minute observation window around a best time.
pub fn observation_window(best_time: Epoch) -> (Epoch, Epoch) {
    let twenty_min = 20.0 * 60.0 * hifitime::Unit::Second;
    (best_time - twenty_min, best_time + twenty_min)
}
