/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Crescent visibility scores: the Yallop q test (NAO TN 69) and the Odeh V
//! criterion, over the classical geometric quantities ARCL, ARCV, DAZ, W, Lag.

use core::fmt;

use crate::math::angles::between_pm_180;

/// The limiting ARCV polynomial shared by both criteria, in degrees, for a
/// topocentric crescent width in arc-minutes.
pub fn arcv_min(w_arcmin: f64) -> f64 {
    11.8371 - 6.3226 * w_arcmin + 0.7319 * w_arcmin * w_arcmin
        - 0.1018 * w_arcmin * w_arcmin * w_arcmin
}

/// The five classical crescent quantities, evaluated at best time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrescentGeometry {
    /// Arc of light: topocentric Sun-Moon angular separation, degrees, [0, 180].
    pub arcl_deg: f64,
    /// Arc of vision: airless Moon altitude minus airless Sun altitude, degrees.
    pub arcv_deg: f64,
    /// Sun azimuth minus Moon azimuth, degrees, normalized to (-180, 180].
    pub daz_deg: f64,
    /// Topocentric crescent width, arc-minutes.
    pub width_arcmin: f64,
    /// Moonset minus sunset, minutes.
    pub lag_minutes: f64,
}

impl CrescentGeometry {
    /// Normalizes DAZ into (-180, 180] at construction time.
    pub fn new(
        arcl_deg: f64,
        arcv_deg: f64,
        daz_deg: f64,
        width_arcmin: f64,
        lag_minutes: f64,
    ) -> Self {
        Self {
            arcl_deg,
            arcv_deg,
            daz_deg: between_pm_180(daz_deg),
            width_arcmin,
            lag_minutes,
        }
    }
}

impl fmt::Display for CrescentGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ARCL {:.2} deg, ARCV {:.2} deg, DAZ {:.2} deg, W {:.3}', lag {:.1} min",
            self.arcl_deg, self.arcv_deg, self.daz_deg, self.width_arcmin, self.lag_minutes
        )
    }
}

/// Yallop's visibility categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum YallopCategory {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl YallopCategory {
    pub fn description(&self) -> &'static str {
        match self {
            Self::A => "easily visible to the naked eye",
            Self::B => "visible under perfect conditions",
            Self::C => "may need optical aid to find the crescent",
            Self::D => "will need optical aid to find the crescent",
            Self::E => "not visible with a telescope",
            Self::F => "not visible, below the Danjon limit",
        }
    }
}

impl fmt::Display for YallopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The Yallop q score and its category.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YallopResult {
    pub q: f64,
    pub category: YallopCategory,
}

impl YallopResult {
    /// `q = (ARCV - arcv_min(W')) / 10`, categorized per NAO TN 69.
    pub fn compute(arcv_deg: f64, w_arcmin: f64) -> Self {
        let q = (arcv_deg - arcv_min(w_arcmin)) / 10.0;
        let category = if q > 0.216 {
            YallopCategory::A
        } else if q > -0.014 {
            YallopCategory::B
        } else if q > -0.160 {
            YallopCategory::C
        } else if q > -0.232 {
            YallopCategory::D
        } else if q > -0.293 {
            YallopCategory::E
        } else {
            YallopCategory::F
        };
        Self { q, category }
    }

    /// Visible without optical aid (categories A and B).
    pub fn naked_eye_visible(&self) -> bool {
        self.category <= YallopCategory::B
    }

    /// Findable at all, possibly with optical aid (categories A through D).
    pub fn potentially_visible(&self) -> bool {
        self.category <= YallopCategory::D
    }
}

/// Odeh's visibility zones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OdehZone {
    A,
    B,
    C,
    D,
}

impl OdehZone {
    pub fn description(&self) -> &'static str {
        match self {
            Self::A => "crescent visible by naked eye",
            Self::B => "crescent visible by optical aid, possibly by naked eye",
            Self::C => "crescent visible by optical aid only",
            Self::D => "crescent not visible even by optical aid",
        }
    }
}

impl fmt::Display for OdehZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The Odeh V score and its zone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdehResult {
    pub v: f64,
    pub zone: OdehZone,
}

impl OdehResult {
    /// `V = ARCV - arcv_min(W)`, zoned per Odeh (2004).
    pub fn compute(arcv_deg: f64, w_arcmin: f64) -> Self {
        let v = arcv_deg - arcv_min(w_arcmin);
        let zone = if v >= 5.65 {
            OdehZone::A
        } else if v >= 2.00 {
            OdehZone::B
        } else if v >= -0.96 {
            OdehZone::C
        } else {
            OdehZone::D
        };
        Self { v, zone }
    }

    pub fn naked_eye_visible(&self) -> bool {
        self.zone == OdehZone::A
    }

    pub fn potentially_visible(&self) -> bool {
        self.zone < OdehZone::D
    }
}

#[cfg(test)]
mod ut_visibility {
    use super::*;
    use rstest::rstest;

    #[test]
    fn arcv_min_at_typical_widths() {
        // At W = 0 the limiting ARCV is the 11.8371 deg constant
        assert!((arcv_min(0.0) - 11.8371).abs() < 1e-12);
        // A wide bright crescent needs little height
        assert!(arcv_min(2.0) < 2.0);
    }

    #[rstest]
    #[case(14.0, 0.3, YallopCategory::A)]
    #[case(10.3, 0.3, YallopCategory::B)]
    #[case(9.0, 0.3, YallopCategory::C)]
    #[case(8.0, 0.3, YallopCategory::D)]
    #[case(7.4, 0.3, YallopCategory::E)]
    #[case(5.0, 0.3, YallopCategory::F)]
    fn yallop_categories(#[case] arcv: f64, #[case] w: f64, #[case] expected: YallopCategory) {
        assert_eq!(YallopResult::compute(arcv, w).category, expected);
    }

    #[rstest]
    #[case(16.0, 0.3, OdehZone::A)]
    #[case(12.5, 0.3, OdehZone::B)]
    #[case(9.5, 0.3, OdehZone::C)]
    #[case(5.0, 0.3, OdehZone::D)]
    fn odeh_zones(#[case] arcv: f64, #[case] w: f64, #[case] expected: OdehZone) {
        assert_eq!(OdehResult::compute(arcv, w).zone, expected);
    }

    #[test]
    fn monotonic_in_arcv() {
        // For fixed W, both scores strictly increase with ARCV
        let mut last_q = f64::NEG_INFINITY;
        let mut last_v = f64::NEG_INFINITY;
        for i in 0..100 {
            let arcv = i as f64 * 0.2;
            let q = YallopResult::compute(arcv, 0.5).q;
            let v = OdehResult::compute(arcv, 0.5).v;
            assert!(q > last_q);
            assert!(v > last_v);
            last_q = q;
            last_v = v;
        }
    }

    #[test]
    fn wider_crescent_needs_less_height() {
        // The limiting-ARCV cubic strictly decreases over the physical width
        // range: a brighter, wider crescent is visible lower in the sky.
        let mut last = f64::INFINITY;
        for i in 0..60 {
            let w = i as f64 * 0.1;
            let limit = arcv_min(w);
            assert!(limit < last, "arcv_min not decreasing at W = {w}");
            last = limit;
        }
    }

    #[test]
    fn daz_is_normalized() {
        let geometry = CrescentGeometry::new(10.0, 8.0, 350.0, 0.5, 45.0);
        assert_eq!(geometry.daz_deg, -10.0);
    }
}
