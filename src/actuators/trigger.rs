use serde::{Deserialize, Serialize};

use crate::input::{GamepadInput, TriggerId};

/// How a trigger pull in [0, 1] maps onto an actuator factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerResponse {
    #[default]
    Linear,
    InverseLinear,
    Squared,
    InverseSquared,
}

impl TriggerResponse {
    pub fn apply(self, pull: f64) -> f64 {
        let t = if pull.is_finite() { pull.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            TriggerResponse::Linear => t,
            TriggerResponse::InverseLinear => 1.0 - t,
            TriggerResponse::Squared => t * t,
            TriggerResponse::InverseSquared => 1.0 - t * t,
        }
    }
}

/// Trigger bound to an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerBinding {
    pub trigger: TriggerId,
    #[serde(default)]
    pub response: TriggerResponse,
}

impl TriggerBinding {
    pub fn factor(&self, input: &GamepadInput) -> f64 {
        self.response.apply(input.trigger(self.trigger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_at_half_pull() {
        assert_eq!(TriggerResponse::Linear.apply(0.5), 0.5);
        assert_eq!(TriggerResponse::InverseLinear.apply(0.5), 0.5);
        assert_eq!(TriggerResponse::Squared.apply(0.5), 0.25);
        assert_eq!(TriggerResponse::InverseSquared.apply(0.5), 0.75);
    }

    #[test]
    fn inverse_curves_full_when_released() {
        assert_eq!(TriggerResponse::InverseLinear.apply(0.0), 1.0);
        assert_eq!(TriggerResponse::InverseSquared.apply(0.0), 1.0);
        assert_eq!(TriggerResponse::Squared.apply(2.0), 1.0);
    }

    #[test]
    fn binding_reads_its_trigger() {
        let b = TriggerBinding { trigger: TriggerId::Left, response: TriggerResponse::Squared };
        let input = GamepadInput::default()
            .with_trigger(TriggerId::Left, 0.4)
            .with_trigger(TriggerId::Right, 1.0);
        assert!((b.factor(&input) - 0.16).abs() < 1e-12);
    }
}
