use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Airborne factor: blend an actuator's effect by height above ground
// ---------------------------------------------------------------------------

/// Response curve selecting how an actuator fades with altitude.
/// Configured as the integer code shown on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum AirborneMode {
    /// 0: not height-dependent, factor is always 1.
    Off,
    /// 1: `multiplier` above the threshold, 1 below.
    BoostAbove,
    /// 2: linear ramp up to 1 below the threshold.
    LinearRise,
    /// 3: quadratic ramp up to 1 below the threshold.
    QuadraticRise,
    /// -1: `multiplier` below the threshold, 0 above.
    OnlyBelow,
    /// -2: linear fade below the threshold, 0 above.
    LinearFade,
    /// -3: quadratic fade below the threshold, 0 above.
    QuadraticFade,
    /// -4: `multiplier` above the threshold, 0 below.
    OnlyAbove,
}

impl TryFrom<i32> for AirborneMode {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => AirborneMode::Off,
            1 => AirborneMode::BoostAbove,
            2 => AirborneMode::LinearRise,
            3 => AirborneMode::QuadraticRise,
            -1 => AirborneMode::OnlyBelow,
            -2 => AirborneMode::LinearFade,
            -3 => AirborneMode::QuadraticFade,
            -4 => AirborneMode::OnlyAbove,
            other => return Err(ConfigError::UnknownAirborneMode(other)),
        })
    }
}

impl From<AirborneMode> for i32 {
    fn from(mode: AirborneMode) -> i32 {
        match mode {
            AirborneMode::Off => 0,
            AirborneMode::BoostAbove => 1,
            AirborneMode::LinearRise => 2,
            AirborneMode::QuadraticRise => 3,
            AirborneMode::OnlyBelow => -1,
            AirborneMode::LinearFade => -2,
            AirborneMode::QuadraticFade => -3,
            AirborneMode::OnlyAbove => -4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirborneCurve {
    pub mode: AirborneMode,
    pub threshold_ratio: f64,
    pub multiplier: f64,
    pub minimum: f64,
}

impl Default for AirborneCurve {
    fn default() -> Self {
        Self { mode: AirborneMode::Off, threshold_ratio: 1.0, multiplier: 1.0, minimum: 0.0 }
    }
}

impl AirborneCurve {
    pub fn evaluate(&self, height_ratio: f64) -> f64 {
        evaluate(self.mode, height_ratio, self.threshold_ratio, self.multiplier, self.minimum)
    }
}

/// Airborne factor for `height_ratio` (ground distance over hover height).
///
/// "Below" means `height_ratio < threshold_ratio`. A non-positive
/// threshold counts as always below, with a normalized ratio of 0.
pub fn evaluate(
    mode: AirborneMode,
    height_ratio: f64,
    threshold_ratio: f64,
    multiplier: f64,
    minimum: f64,
) -> f64 {
    let (below, ratio) = if threshold_ratio > 0.0 {
        (height_ratio < threshold_ratio, height_ratio / threshold_ratio)
    } else {
        (true, 0.0)
    };
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    let clamp01 = |v: f64| v.clamp(0.0, 1.0);

    match mode {
        AirborneMode::Off => 1.0,
        AirborneMode::BoostAbove => if below { 1.0 } else { multiplier },
        AirborneMode::LinearRise => if below { clamp01(multiplier * ratio + minimum) } else { 1.0 },
        AirborneMode::QuadraticRise => {
            if below { clamp01(multiplier * ratio * ratio + minimum) } else { 1.0 }
        }
        AirborneMode::OnlyBelow => if below { multiplier } else { 0.0 },
        AirborneMode::LinearFade => {
            if below { clamp01(multiplier * (1.0 - ratio) + minimum) } else { 0.0 }
        }
        AirborneMode::QuadraticFade => {
            if below { clamp01(multiplier * (1.0 - ratio * ratio) + minimum) } else { 0.0 }
        }
        AirborneMode::OnlyAbove => if below { 0.0 } else { multiplier },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_reject_unknown() {
        for code in [-4, -3, -2, -1, 0, 1, 2, 3] {
            let mode = AirborneMode::try_from(code).unwrap();
            assert_eq!(i32::from(mode), code);
        }
        assert!(matches!(AirborneMode::try_from(4), Err(ConfigError::UnknownAirborneMode(4))));
        assert!(AirborneMode::try_from(-5).is_err());
    }

    #[test]
    fn linear_rise_boundary() {
        let m = AirborneMode::LinearRise;
        assert_eq!(evaluate(m, 2.0, 2.0, 0.8, 0.1), 1.0);
        assert!((evaluate(m, 0.0, 2.0, 0.8, 0.1) - 0.1).abs() < 1e-12);
        assert!((evaluate(m, 1e-9, 2.0, 0.8, 0.1) - 0.1).abs() < 1e-6);
        assert!((evaluate(m, 1.0, 2.0, 0.8, 0.1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn quadratic_curves() {
        assert!((evaluate(AirborneMode::QuadraticRise, 1.0, 2.0, 1.0, 0.0) - 0.25).abs() < 1e-12);
        assert!((evaluate(AirborneMode::QuadraticFade, 1.0, 2.0, 1.0, 0.0) - 0.75).abs() < 1e-12);
        assert_eq!(evaluate(AirborneMode::QuadraticFade, 3.0, 2.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn step_modes() {
        assert_eq!(evaluate(AirborneMode::BoostAbove, 3.0, 2.0, 1.5, 0.0), 1.5);
        assert_eq!(evaluate(AirborneMode::BoostAbove, 1.0, 2.0, 1.5, 0.0), 1.0);
        assert_eq!(evaluate(AirborneMode::OnlyBelow, 1.0, 2.0, 0.7, 0.0), 0.7);
        assert_eq!(evaluate(AirborneMode::OnlyBelow, 3.0, 2.0, 0.7, 0.0), 0.0);
        assert_eq!(evaluate(AirborneMode::OnlyAbove, 3.0, 2.0, 0.7, 0.0), 0.7);
        assert_eq!(evaluate(AirborneMode::OnlyAbove, 1.0, 2.0, 0.7, 0.0), 0.0);
        assert_eq!(evaluate(AirborneMode::LinearFade, 2.5, 2.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn off_is_always_one() {
        for h in [0.0, 0.5, 10.0, 1e6] {
            assert_eq!(evaluate(AirborneMode::Off, h, 1.0, 5.0, 3.0), 1.0);
        }
    }

    #[test]
    fn zero_threshold_counts_as_below() {
        assert!((evaluate(AirborneMode::LinearFade, 5.0, 0.0, 0.5, 0.2) - 0.7).abs() < 1e-12);
        assert_eq!(evaluate(AirborneMode::OnlyAbove, 5.0, 0.0, 0.5, 0.0), 0.0);
        assert!(evaluate(AirborneMode::LinearRise, 5.0, 0.0, 0.5, 0.2).is_finite());
    }
}
