/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::error;

use super::super::{EphemerisError, InterpolationSnafu, SPKSnafu};
use crate::math::interpolation::{chebyshev_eval, chebyshev_eval_poly};
use crate::math::cartesian::StateVector;
use crate::math::Vector3;
use crate::naif::daf::DAF;
use crate::naif::spk::SpkSegment;
use snafu::ResultExt;

/// The four-double directory stored at the very end of a type 2 or type 3
/// segment: initial record ET, record interval, doubles per record, and
/// record count.
#[derive(Clone, Copy, Debug)]
struct SegmentDirectory {
    init_et: f64,
    interval_s: f64,
    rsize: usize,
    num_records: usize,
}

impl SegmentDirectory {
    fn read(daf: &DAF, segment: &SpkSegment) -> Result<Self, EphemerisError> {
        if segment.len_f64() < 4 {
            error!("segment too short for a directory: {segment}");
            return Err(EphemerisError::MalformedSegment {
                reason: "fewer than four doubles in segment",
            });
        }
        let dir = daf
            .read_f64s(segment.end_addr - 3, 4)
            .context(SPKSnafu {
                action: "reading the segment directory",
            })?;
        let rsize = dir[2] as usize;
        let num_records = dir[3] as usize;
        if rsize < 2 || num_records == 0 || dir[1] <= 0.0 {
            return Err(EphemerisError::MalformedSegment {
                reason: "directory has a non-positive interval, record size below 2, or no records",
            });
        }
        Ok(Self {
            init_et: dir[0],
            interval_s: dir[1],
            rsize,
            num_records,
        })
    }

    /// Index of the record covering `et`, clamped into the segment.
    fn record_index(&self, et: f64) -> usize {
        let idx = ((et - self.init_et) / self.interval_s).floor();
        if idx < 0.0 {
            0
        } else {
            (idx as usize).min(self.num_records - 1)
        }
    }

    /// Reads record `idx` as raw doubles.
    fn record(
        &self,
        daf: &DAF,
        segment: &SpkSegment,
        idx: usize,
    ) -> Result<Vec<f64>, EphemerisError> {
        let start_word = segment.begin_addr + idx * self.rsize;
        daf.read_f64s(start_word, self.rsize).context(SPKSnafu {
            action: "reading a Chebyshev record",
        })
    }
}

/// SPK data type 2: Chebyshev position-only. Velocity is the rescaled
/// derivative of the position polynomials.
pub struct Type2ChebyshevSet;

impl Type2ChebyshevSet {
    pub fn evaluate(
        daf: &DAF,
        segment: &SpkSegment,
        et: f64,
    ) -> Result<StateVector, EphemerisError> {
        let dir = SegmentDirectory::read(daf, segment)?;
        if dir.rsize < 5 {
            return Err(EphemerisError::MalformedSegment {
                reason: "type 2 record too short for one coefficient per axis",
            });
        }
        let degree = (dir.rsize - 2) / 3 - 1;
        let record = dir.record(daf, segment, dir.record_index(et))?;

        let mid = record[0];
        let radius = record[1];
        if radius <= 0.0 {
            return Err(EphemerisError::MalformedSegment {
                reason: "record radius is not positive",
            });
        }
        let normalized_time = (et - mid) / radius;

        let n_coeffs = degree + 1;
        let mut pos = Vector3::zeros();
        let mut vel = Vector3::zeros();
        for cno in 0..3 {
            let coeffs = &record[2 + cno * n_coeffs..2 + (cno + 1) * n_coeffs];
            let (val, deriv) = chebyshev_eval(normalized_time, coeffs, radius, degree)
                .context(InterpolationSnafu)?;
            pos[cno] = val;
            vel[cno] = deriv;
        }

        Ok(StateVector {
            position_km: pos,
            velocity_km_s: vel,
        })
    }
}

/// SPK data type 3: Chebyshev position and velocity. The velocity polynomials
/// are evaluated directly; their value is already in km/s.
pub struct Type3ChebyshevSet;

impl Type3ChebyshevSet {
    pub fn evaluate(
        daf: &DAF,
        segment: &SpkSegment,
        et: f64,
    ) -> Result<StateVector, EphemerisError> {
        let dir = SegmentDirectory::read(daf, segment)?;
        if dir.rsize < 8 {
            return Err(EphemerisError::MalformedSegment {
                reason: "type 3 record too short for one coefficient per component",
            });
        }
        let degree = (dir.rsize - 2) / 6 - 1;
        let record = dir.record(daf, segment, dir.record_index(et))?;

        let mid = record[0];
        let radius = record[1];
        if radius <= 0.0 {
            return Err(EphemerisError::MalformedSegment {
                reason: "record radius is not positive",
            });
        }
        let normalized_time = (et - mid) / radius;

        let n_coeffs = degree + 1;
        let mut pos = Vector3::zeros();
        let mut vel = Vector3::zeros();
        for cno in 0..3 {
            let coeffs = &record[2 + cno * n_coeffs..2 + (cno + 1) * n_coeffs];
            pos[cno] = chebyshev_eval_poly(normalized_time, coeffs, degree)
                .context(InterpolationSnafu)?;
        }
        for cno in 0..3 {
            let base = 2 + (3 + cno) * n_coeffs;
            let coeffs = &record[base..base + n_coeffs];
            vel[cno] = chebyshev_eval_poly(normalized_time, coeffs, degree)
                .context(InterpolationSnafu)?;
        }

        Ok(StateVector {
            position_km: pos,
            velocity_km_s: vel,
        })
    }
}
