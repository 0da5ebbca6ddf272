/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Celestial Intermediate Pole coordinates: IAU 2006 precession polynomials
//! with the IAU 2000B nutation contributions, and the CIO locator.

use crate::constants::ARCSEC_TO_RAD;
use crate::math::rotation::{rot_y, rot_z};
use crate::math::Matrix3;

use super::nutation::nutation_iau2000b;

/// Mean obliquity of the ecliptic ε₀ in radians (IAU 2006), at `t` Julian
/// centuries of TT since J2000.
pub fn mean_obliquity(t: f64) -> f64 {
    (84381.406
        + t * (-46.836769
            + t * (-0.0001831 + t * (0.00200340 + t * (-0.000000576 + t * (-0.0000000434))))))
        * ARCSEC_TO_RAD
}

/// CIP coordinates (X, Y) in radians: the IAU 2006 precession polynomial parts
/// plus the nutation contributions.
pub fn cip_xy(t: f64) -> (f64, f64) {
    // Polynomial parts of the X and Y series, in arcseconds (IERS 2010, eq. 5.16)
    let x_prec = -0.016617
        + t * (2004.191898
            + t * (-0.4297829 + t * (-0.19861834 + t * (0.000007578 + t * 0.0000059285))));
    let y_prec = -0.006951
        + t * (-0.025896
            + t * (-22.4072747 + t * (0.00190059 + t * (0.001112526 + t * 0.0000001358))));

    let nut = nutation_iau2000b(t);
    let eps0 = mean_obliquity(t);

    let x = x_prec * ARCSEC_TO_RAD + nut.dpsi * eps0.sin();
    let y = y_prec * ARCSEC_TO_RAD - nut.deps;
    (x, y)
}

/// The CIO locator s, in radians: the −XY/2 closed form plus its secular term.
pub fn cio_locator_s(x: f64, y: f64, t: f64) -> f64 {
    -x * y / 2.0 - 0.041775 * ARCSEC_TO_RAD * t
}

/// The celestial-motion matrix Q taking GCRS coordinates to the Celestial
/// Intermediate Reference System:
///
/// ```text
/// e = atan2(Y, X)          (0 when the CIP sits at the GCRS pole)
/// d = asin(sqrt(X² + Y²))
/// Q = Rz(−(e+s)) · Ry(d) · Rz(e)
/// ```
pub fn celestial_motion_matrix(t: f64) -> Matrix3 {
    let (x, y) = cip_xy(t);
    let s = cio_locator_s(x, y, t);

    let r2 = x * x + y * y;
    let e = if r2 > 0.0 { y.atan2(x) } else { 0.0 };
    let d = r2.sqrt().min(1.0).asin();

    rot_z(-(e + s)) * rot_y(d) * rot_z(e)
}
