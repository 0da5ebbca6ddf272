/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

// Vector3 is nalgebra's Vector3 with a 64-bit floating point representation.
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;

pub mod angles;
pub mod cartesian;
pub mod interpolation;
pub mod roots;
pub mod rotation;

use crate::errors::MathError;

/// Returns the unit vector of the provided vector, or a `ZeroVector` error if its norm is zero.
pub fn try_unit(v: &Vector3, action: &'static str) -> Result<Vector3, MathError> {
    v.try_normalize(0.0)
        .ok_or(MathError::ZeroVector { action })
}

/// Returns the angular separation between two direction vectors, in radians.
///
/// The dot product is clamped to `[-1, 1]` before the `acos` so that nearly
/// parallel vectors do not produce a NaN through floating point noise.
pub fn angle_between(a: &Vector3, b: &Vector3) -> Result<f64, MathError> {
    let ua = try_unit(a, "computing an angular separation")?;
    let ub = try_unit(b, "computing an angular separation")?;
    Ok(ua.dot(&ub).clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod ut_math {
    use super::*;

    #[test]
    fn angle_between_is_clamped() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        // Parallel vectors whose dot product may exceed 1.0 by floating point noise
        let almost_x = Vector3::new(1.0 + 1e-16, 1e-18, 0.0);
        let sep = angle_between(&x, &almost_x).unwrap();
        assert!(sep.is_finite());
        assert!(sep.abs() < 1e-8);

        let y = Vector3::new(0.0, 2.0, 0.0);
        assert!((angle_between(&x, &y).unwrap() - core::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn zero_vector_errors() {
        let zero = Vector3::zeros();
        let x = Vector3::new(1.0, 0.0, 0.0);
        assert!(matches!(
            angle_between(&zero, &x),
            Err(MathError::ZeroVector { .. })
        ));
    }
}
