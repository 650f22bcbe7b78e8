//! Latency to color classification
//!
//! Colors are expressed in OKLCH so that the gradient between tiers changes
//! evenly to the eye. Replies use a three-segment gradient over 0-300 ms;
//! timeouts and errors have fixed colors outside that gradient.

use crate::event::Outcome;
use crate::monitor::constants::{GOOD_LATENCY_MS, MAX_CLASSIFIED_LATENCY_MS, OKAY_LATENCY_MS};
use std::fmt;

/// Hue where the okay segment starts (yellow)
const OKAY_HUE: f64 = 95.0;
/// Hue where the okay segment ends and the poor segment starts (red)
const POOR_HUE: f64 = 30.0;
/// Hue at the clamped maximum latency (deep red)
const DEEP_HUE: f64 = 15.0;

const GRADIENT_LIGHTNESS: f64 = 0.65;
const DEEP_LIGHTNESS: f64 = 0.50;
const GRADIENT_CHROMA: f64 = 0.25;

/// Fixed color for replies at or below the good threshold
pub const GOOD_COLOR: Oklch = Oklch::new(0.75, 0.2, 149.0);
/// Saturated dark red for timeouts
pub const TIMEOUT_COLOR: Oklch = Oklch::new(0.45, 0.25, 25.0);
/// Desaturated gray for errors
pub const ERROR_COLOR: Oklch = Oklch::new(0.55, 0.02, 260.0);

/// A color in the OKLCH space: lightness 0-1, chroma, hue in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
}

impl Oklch {
    pub const fn new(lightness: f64, chroma: f64, hue: f64) -> Self {
        Self {
            lightness,
            chroma,
            hue,
        }
    }

    /// Convert to 8-bit sRGB, clipping out-of-gamut channels
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let hue = self.hue.to_radians();
        let a = self.chroma * hue.cos();
        let b = self.chroma * hue.sin();

        // OKLab -> LMS (cube roots)
        let l_ = self.lightness + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
        let m_ = self.lightness - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
        let s_ = self.lightness - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        // LMS -> linear sRGB
        let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
        let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
        let b = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s;

        (encode_srgb(r), encode_srgb(g), encode_srgb(b))
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oklch({} {} {})", self.lightness, self.chroma, self.hue)
    }
}

fn encode_srgb(linear: f64) -> u8 {
    let x = linear.clamp(0.0, 1.0);
    let encoded = if x <= 0.003_130_8 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

/// Map a reply latency to its status-light color.
///
/// - `<= 50 ms`: the fixed good color
/// - `50-150 ms`: hue moves from yellow (95) to red (30)
/// - `150-300 ms`: hue moves from 30 to 15 while lightness drops from 0.65 to 0.50
///
/// Values above 300 ms color like 300 ms; negative values and NaN like 0 ms.
pub fn classify(latency_ms: f64) -> Oklch {
    let clamped = if latency_ms.is_nan() {
        0.0
    } else {
        latency_ms.clamp(0.0, MAX_CLASSIFIED_LATENCY_MS)
    };

    if clamped <= GOOD_LATENCY_MS {
        GOOD_COLOR
    } else if clamped <= OKAY_LATENCY_MS {
        let t = (clamped - GOOD_LATENCY_MS) / (OKAY_LATENCY_MS - GOOD_LATENCY_MS);
        Oklch::new(
            GRADIENT_LIGHTNESS,
            GRADIENT_CHROMA,
            OKAY_HUE - t * (OKAY_HUE - POOR_HUE),
        )
    } else {
        let t = (clamped - OKAY_LATENCY_MS) / (MAX_CLASSIFIED_LATENCY_MS - OKAY_LATENCY_MS);
        Oklch::new(
            GRADIENT_LIGHTNESS - t * (GRADIENT_LIGHTNESS - DEEP_LIGHTNESS),
            GRADIENT_CHROMA,
            POOR_HUE - t * (POOR_HUE - DEEP_HUE),
        )
    }
}

/// Color for any outcome: the latency gradient for replies, fixed colors otherwise
pub fn color_for(outcome: &Outcome) -> Oklch {
    match outcome {
        Outcome::Reply { latency_ms } => classify(*latency_ms),
        Outcome::Timeout => TIMEOUT_COLOR,
        Outcome::Error { .. } => ERROR_COLOR,
    }
}

/// Perceptual bucket of an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityTier {
    Good,
    Okay,
    Poor,
    Timeout,
    Error,
}

impl SeverityTier {
    pub fn of(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Reply { latency_ms } => Self::for_latency(*latency_ms),
            Outcome::Timeout => SeverityTier::Timeout,
            Outcome::Error { .. } => SeverityTier::Error,
        }
    }

    pub fn for_latency(latency_ms: f64) -> Self {
        if latency_ms.is_nan() || latency_ms <= GOOD_LATENCY_MS {
            SeverityTier::Good
        } else if latency_ms <= OKAY_LATENCY_MS {
            SeverityTier::Okay
        } else {
            SeverityTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Good => "good",
            SeverityTier::Okay => "okay",
            SeverityTier::Poor => "poor",
            SeverityTier::Timeout => "timeout",
            SeverityTier::Error => "error",
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_hue_never_increases(a in 0.0f64..400.0, b in 0.0f64..400.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assume!(low > GOOD_LATENCY_MS);
            prop_assert!(classify(high).hue <= classify(low).hue);
            prop_assert!(classify(high).lightness <= classify(low).lightness);
        }

        #[test]
        fn test_gradient_stays_in_range(ms in -100.0f64..1000.0) {
            let color = classify(ms);
            prop_assert!(color.lightness >= DEEP_LIGHTNESS && color.lightness <= GOOD_COLOR.lightness);
            prop_assert!(color.hue >= DEEP_HUE && color.hue <= GOOD_COLOR.hue);
        }
    }
}
