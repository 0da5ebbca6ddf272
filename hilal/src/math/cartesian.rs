/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;
use core::ops::{Add, Neg, Sub};

use super::Vector3;

/// Position and velocity of one body relative to another, in the ICRF/J2000
/// (~GCRS) frame for anything read from an SPK.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Position in kilometers
    pub position_km: Vector3,
    /// Velocity in kilometers per second
    pub velocity_km_s: Vector3,
}

impl StateVector {
    pub fn zeros() -> Self {
        Self {
            position_km: Vector3::zeros(),
            velocity_km_s: Vector3::zeros(),
        }
    }
}

impl Sub for StateVector {
    type Output = StateVector;

    /// Componentwise subtraction on both position and velocity, used to chain
    /// ephemeris segments through a common center.
    fn sub(self, rhs: Self) -> Self {
        Self {
            position_km: self.position_km - rhs.position_km,
            velocity_km_s: self.velocity_km_s - rhs.velocity_km_s,
        }
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: Self) -> Self {
        Self {
            position_km: self.position_km + rhs.position_km,
            velocity_km_s: self.velocity_km_s + rhs.velocity_km_s,
        }
    }
}

impl Neg for StateVector {
    type Output = StateVector;

    fn neg(self) -> Self {
        Self {
            position_km: -self.position_km,
            velocity_km_s: -self.velocity_km_s,
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos = [{:.3}, {:.3}, {:.3}] km\tvel = [{:.6}, {:.6}, {:.6}] km/s",
            self.position_km[0],
            self.position_km[1],
            self.position_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2]
        )
    }
}
