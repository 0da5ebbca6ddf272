/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Bennett's refraction formula, scaled for local pressure and temperature.

/// Refraction in degrees for a geometric altitude `h_deg`, at pressure
/// `pressure_mbar` and temperature `temperature_c`. Zero below -1°.
pub fn bennett_refraction_deg(h_deg: f64, pressure_mbar: f64, temperature_c: f64) -> f64 {
    if h_deg < -1.0 {
        return 0.0;
    }
    let arg_deg = h_deg + 7.31 / (h_deg + 4.4);
    let r_arcmin = 1.0 / arg_deg.to_radians().tan();
    let r_deg = r_arcmin / 60.0;
    r_deg * (pressure_mbar / 1010.0) * (283.0 / (273.0 + temperature_c))
}

/// Adds refraction to a geometric (airless) altitude, yielding the apparent one.
pub fn apply_refraction(h_deg: f64, pressure_mbar: f64, temperature_c: f64) -> f64 {
    h_deg + bennett_refraction_deg(h_deg, pressure_mbar, temperature_c)
}

/// Inverts [`apply_refraction`] by fixed-point iteration (four rounds).
pub fn remove_refraction(h_apparent_deg: f64, pressure_mbar: f64, temperature_c: f64) -> f64 {
    let mut h = h_apparent_deg;
    for _ in 0..4 {
        h = h_apparent_deg - bennett_refraction_deg(h, pressure_mbar, temperature_c);
    }
    h
}
