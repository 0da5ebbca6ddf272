/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod datatypes;
mod summary;

pub use summary::SpkSegment;

use bytes::Bytes;
use log::{trace, warn};
use snafu::prelude::*;

use crate::constants::naif_ids::{
    EARTH, EARTH_MOON_BARYCENTER, MOON, SOLAR_SYSTEM_BARYCENTER, SUN,
};
use crate::errors::MathError;
use crate::math::cartesian::StateVector;
use crate::naif::daf::{DAFError, DAF};
use crate::NaifId;
use datatypes::{Type2ChebyshevSet, Type3ChebyshevSet};

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EphemerisError {
    #[snafu(display("{action} failed on the underlying DAF: {source}"))]
    SPK { action: &'static str, source: DAFError },
    #[snafu(display("no segment path from target {target} to center {center}"))]
    NoSegmentPath { target: NaifId, center: NaifId },
    #[snafu(display(
        "epoch {et:.3} s past J2000 TDB is outside the loaded coverage for target {target} (DE442S covers 1849 to 2150)"
    ))]
    OutOfRange { target: NaifId, et: f64 },
    #[snafu(display("SPK data type {dtype} is not supported (only Chebyshev types 2 and 3)"))]
    UnsupportedDataType { dtype: i32 },
    #[snafu(display("segment data is malformed: {reason}"))]
    MalformedSegment { reason: &'static str },
    #[snafu(display("interpolation failed: {source}"))]
    Interpolation { source: MathError },
}

/// A loaded SPK kernel: the parsed DAF plus its segment index. Immutable; all
/// queries borrow it read-only.
#[derive(Clone, Debug)]
pub struct SPK {
    pub daf: DAF,
    segments: Vec<SpkSegment>,
}

impl SPK {
    /// Parses the provided bytes as a DAF/SPK file and indexes its segments.
    pub fn parse(bytes: Bytes) -> Result<Self, EphemerisError> {
        let daf = DAF::parse(bytes).context(SPKSnafu {
            action: "parsing the file and summary records",
        })?;

        let mut segments = Vec::new();
        for raw in daf.summaries().context(SPKSnafu {
            action: "walking the summary record chain",
        })? {
            let segment = SpkSegment::from_raw(&raw).context(SPKSnafu {
                action: "decoding an array summary",
            })?;
            if segment.start_et >= segment.end_et {
                warn!("ignoring segment with empty coverage: {segment}");
                continue;
            }
            trace!("indexed {segment}");
            segments.push(segment);
        }

        Ok(Self { daf, segments })
    }

    /// All indexed segments, in file order.
    pub fn segments(&self) -> &[SpkSegment] {
        &self.segments
    }

    /// Evaluates the segment holding `(target, center)` at `et`, without chaining.
    ///
    /// Returns `Ok(None)` when no segment carries this pair at all (the caller
    /// may synthesize the state through a common center), and `OutOfRange`
    /// when the pair exists but none of its segments covers `et`.
    fn direct_state(
        &self,
        target: NaifId,
        center: NaifId,
        et: f64,
    ) -> Result<Option<StateVector>, EphemerisError> {
        let mut found_pair = false;
        for segment in &self.segments {
            if segment.target_id != target || segment.center_id != center {
                continue;
            }
            found_pair = true;
            if !segment.covers(et) {
                continue;
            }
            let state = match segment.data_type {
                2 => Type2ChebyshevSet::evaluate(&self.daf, segment, et)?,
                3 => Type3ChebyshevSet::evaluate(&self.daf, segment, et)?,
                dtype => return Err(EphemerisError::UnsupportedDataType { dtype }),
            };
            return Ok(Some(state));
        }

        if found_pair {
            Err(EphemerisError::OutOfRange { target, et })
        } else {
            Ok(None)
        }
    }

    /// Position and velocity of `target` relative to `center` at `et` seconds
    /// past J2000 TDB, in km and km/s, ICRF/J2000 axes.
    ///
    /// When the kernel holds no direct `(target, center)` segment, the state
    /// is synthesized through a common center: Moon and Earth chain through
    /// the Earth-Moon barycenter, Sun queries chain through the solar system
    /// barycenter, and any other pair falls back to differencing both bodies
    /// against the solar system barycenter.
    pub fn state(
        &self,
        target: NaifId,
        center: NaifId,
        et: f64,
    ) -> Result<StateVector, EphemerisError> {
        if let Some(state) = self.direct_state(target, center, et)? {
            return Ok(state);
        }

        match (target, center) {
            (MOON, EARTH) => {
                let moon_emb = self.require(MOON, EARTH_MOON_BARYCENTER, et, target, center)?;
                let earth_emb = self.require(EARTH, EARTH_MOON_BARYCENTER, et, target, center)?;
                Ok(moon_emb - earth_emb)
            }
            (EARTH, MOON) => Ok(-self.state(MOON, EARTH, et)?),
            (SUN, EARTH) => {
                let sun_ssb = self.require(SUN, SOLAR_SYSTEM_BARYCENTER, et, target, center)?;
                let emb_ssb =
                    self.require(EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER, et, target, center)?;
                let earth_emb = self.require(EARTH, EARTH_MOON_BARYCENTER, et, target, center)?;
                // Earth/SSB = EMB/SSB + Earth/EMB
                Ok(sun_ssb - (emb_ssb + earth_emb))
            }
            (EARTH, SUN) => Ok(-self.state(SUN, EARTH, et)?),
            (a, b) if a != b => {
                let a_ssb = self.require(a, SOLAR_SYSTEM_BARYCENTER, et, target, center)?;
                let b_ssb = self.require(b, SOLAR_SYSTEM_BARYCENTER, et, target, center)?;
                Ok(a_ssb - b_ssb)
            }
            _ => Ok(StateVector::zeros()),
        }
    }

    /// A chaining step: the direct state must exist, else the whole chain
    /// reports `NoSegmentPath` for the original request.
    fn require(
        &self,
        target: NaifId,
        center: NaifId,
        et: f64,
        req_target: NaifId,
        req_center: NaifId,
    ) -> Result<StateVector, EphemerisError> {
        self.direct_state(target, center, et)?
            .ok_or(EphemerisError::NoSegmentPath {
                target: req_target,
                center: req_center,
            })
    }
}
