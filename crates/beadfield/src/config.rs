use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Engine tuning. Every field has a default, so partial configs deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Energy ("temperature") at construction and after [`LayoutEngine::reset_energy`].
    ///
    /// [`LayoutEngine::reset_energy`]: crate::LayoutEngine::reset_energy
    pub initial_energy: f64,
    /// `t <- t - t^2 * cooling_coefficient` on every cool.
    pub cooling_coefficient: f64,
    /// Radius of a rendered bead. Feeds the spacing constant and the view transform.
    pub node_radius: f64,
    /// Floor applied to the node count before deriving `(C, k)`; keeps small graphs from
    /// clumping.
    pub min_node_count: usize,
    /// Multiplier on the per-tick step length.
    pub speed: f64,
    /// Repulsion factor of a node nobody is holding.
    pub rest_repulse: f64,
    /// Repulsion factor while a node is held by the input layer.
    pub held_repulse: f64,
    /// Pair distances below this are clamped up to it.
    pub min_distance: f64,
    /// `is_settled` reports true once energy drops to this value.
    pub settle_energy: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            initial_energy: 6.0,
            cooling_coefficient: 0.013,
            node_radius: 20.0,
            min_node_count: 5,
            speed: 1.0,
            rest_repulse: 0.4,
            held_repulse: 1.4,
            min_distance: 0.01,
            settle_energy: 0.05,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("initialEnergy", self.initial_energy),
            ("nodeRadius", self.node_radius),
            ("speed", self.speed),
            ("restRepulse", self.rest_repulse),
            ("heldRepulse", self.held_repulse),
            ("minDistance", self.min_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid_argument(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        let non_negative = [
            ("coolingCoefficient", self.cooling_coefficient),
            ("settleEnergy", self.settle_energy),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid_argument(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutConfig;
    use crate::Error;

    #[test]
    fn default_config_is_valid() {
        LayoutConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_radius_and_negative_cooling() {
        let cfg = LayoutConfig {
            node_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidArgument { .. })
        ));

        let cfg = LayoutConfig {
            cooling_coefficient: -0.1,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = LayoutConfig {
            cooling_coefficient: 0.0,
            settle_energy: 0.0,
            ..Default::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{ "initialEnergy": 12.5, "minNodeCount": 2 }"#).unwrap();
        assert_eq!(cfg.initial_energy, 12.5);
        assert_eq!(cfg.min_node_count, 2);
        assert_eq!(cfg.node_radius, LayoutConfig::default().node_radius);
    }
}
