/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::errors::MathError;

/// Evaluates a Chebyshev polynomial with the Clenshaw recurrence, returning the
/// value and its derivative with respect to physical time.
///
/// `normalized_time` must be in `[-1, 1]`; `spline_radius_s` rescales the
/// derivative from the normalized domain back to seconds. Clenshaw's form is
/// required for numerical stability over the high-degree polynomials found in
/// planetary ephemerides.
pub fn chebyshev_eval(
    normalized_time: f64,
    spline_coeffs: &[f64],
    spline_radius_s: f64,
    degree: usize,
) -> Result<(f64, f64), MathError> {
    if spline_radius_s.abs() < f64::EPSILON {
        return Err(MathError::DivisionByZero {
            action: "spline radius in Chebyshev eval is zero",
        });
    }

    // Workspace arrays
    let mut w = [0.0_f64; 3];
    let mut dw = [0.0_f64; 3];

    for j in (2..=degree + 1).rev() {
        w[2] = w[1];
        w[1] = w[0];
        w[0] = (spline_coeffs.get(j - 1).ok_or(MathError::DomainError {
            value: (j - 1) as f64,
            msg: "not enough Chebyshev coefficients",
        })?) + (2.0 * normalized_time * w[1] - w[2]);

        dw[2] = dw[1];
        dw[1] = dw[0];
        dw[0] = w[1] * 2. + dw[1] * 2.0 * normalized_time - dw[2];
    }

    let val = (spline_coeffs.first().ok_or(MathError::DomainError {
        value: 0.0,
        msg: "not enough Chebyshev coefficients",
    })?) + (normalized_time * w[0] - w[1]);

    let deriv = (w[0] + normalized_time * dw[0] - dw[1]) / spline_radius_s;

    Ok((val, deriv))
}

/// Evaluates a Chebyshev polynomial with the Clenshaw recurrence, returning only the value.
pub fn chebyshev_eval_poly(
    normalized_time: f64,
    spline_coeffs: &[f64],
    degree: usize,
) -> Result<f64, MathError> {
    let mut w = [0.0_f64; 3];

    for j in (2..=degree + 1).rev() {
        w[2] = w[1];
        w[1] = w[0];
        w[0] = (spline_coeffs.get(j - 1).ok_or(MathError::DomainError {
            value: (j - 1) as f64,
            msg: "not enough Chebyshev coefficients",
        })?) + (2.0 * normalized_time * w[1] - w[2]);
    }

    let val = (normalized_time * w[0]) - w[1]
        + (spline_coeffs.first().ok_or(MathError::DomainError {
            value: 0.0,
            msg: "not enough Chebyshev coefficients",
        })?);

    Ok(val)
}

#[cfg(test)]
mod ut_chebyshev {
    use super::*;

    #[test]
    fn matches_direct_evaluation() {
        // T0 + 2 T1 + 3 T2 at x: 1 + 2x + 3(2x^2 - 1)
        let coeffs = [1.0, 2.0, 3.0];
        for x in [-1.0, -0.5, 0.0, 0.3, 1.0] {
            let direct = 1.0 + 2.0 * x + 3.0 * (2.0 * x * x - 1.0);
            let (val, deriv) = chebyshev_eval(x, &coeffs, 1.0, 2).unwrap();
            assert!((val - direct).abs() < 1e-14);
            // d/dx: 2 + 12x
            assert!((deriv - (2.0 + 12.0 * x)).abs() < 1e-13);
            let only_val = chebyshev_eval_poly(x, &coeffs, 2).unwrap();
            assert!((only_val - direct).abs() < 1e-14);
        }
    }

    #[test]
    fn derivative_rescales_by_radius() {
        let coeffs = [0.0, 1.0];
        // T1 = x, derivative 1 in normalized domain, 1/radius in seconds
        let (_, deriv) = chebyshev_eval(0.5, &coeffs, 43_200.0, 1).unwrap();
        assert!((deriv - 1.0 / 43_200.0).abs() < 1e-18);
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(chebyshev_eval(0.0, &[1.0], 0.0, 0).is_err());
    }
}
