//! Surface material for masonry solids
//!
//! One immutable value is owned by the simulation configuration and handed
//! by reference to every solid-construction call. Nothing in the crate keeps
//! a shared mutable material around.

use serde::{Deserialize, Serialize};

/// Contact surface properties forwarded to the external engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialProperties {
    /// Coulomb friction coefficient (dimensionless)
    pub friction: f64,
    /// Rolling friction coefficient (meters)
    pub rolling_friction: f64,
    /// Coefficient of restitution, 0 = perfectly plastic, 1 = elastic
    pub restitution: f64,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            friction: 0.6, // dry stone on stone
            rolling_friction: 0.0,
            restitution: 0.0,
        }
    }
}

impl MaterialProperties {
    /// Check the coefficients are physically meaningful.
    ///
    /// # Returns
    /// The name of the first offending field, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        if !self.friction.is_finite() || self.friction < 0.0 {
            return Some("friction");
        }
        if !self.rolling_friction.is_finite() || self.rolling_friction < 0.0 {
            return Some("rolling_friction");
        }
        if !self.restitution.is_finite() || !(0.0..=1.0).contains(&self.restitution) {
            return Some("restitution");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_is_valid() {
        assert_eq!(MaterialProperties::default().invalid_field(), None);
    }

    #[test]
    fn rejects_out_of_range_coefficients() {
        let material = MaterialProperties {
            restitution: 1.5,
            ..Default::default()
        };
        assert_eq!(material.invalid_field(), Some("restitution"));

        let material = MaterialProperties {
            friction: -0.1,
            ..Default::default()
        };
        assert_eq!(material.invalid_field(), Some("friction"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let material: MaterialProperties = serde_json::from_str(r#"{"friction":0.9}"#).unwrap();
        assert_eq!(material.friction, 0.9);
        assert_eq!(material.restitution, 0.0);
    }
}
