// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Thermal Driving
// ─────────────────────────────────────────────────────────────────────
//! T(t) = 1 + δ_T sin(ω_T t), applied multiplicatively to the source.

use serde::{Deserialize, Serialize};

use jt_types::JtConfig;

/// Stateless temperature modulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureModel {
    pub delta_temp: f64,
    pub omega_temp: f64,
}

impl TemperatureModel {
    pub fn new(delta_temp: f64, omega_temp: f64) -> Self {
        Self { delta_temp, omega_temp }
    }

    pub fn from_config(config: &JtConfig) -> Self {
        Self::new(config.delta_temp, config.omega_temp)
    }

    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        1.0 + self.delta_temp * (self.omega_temp * t).sin()
    }

    pub fn series(&self, t: &[f64]) -> Vec<f64> {
        t.iter().map(|&ti| self.at(ti)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amplitude_is_unity() {
        let model = TemperatureModel::new(0.0, 0.5);
        let ts: Vec<f64> = (0..100).map(|i| i as f64 * 0.37 - 5.0).collect();
        assert!(model.series(&ts).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_bounded_by_amplitude() {
        let model = TemperatureModel::from_config(&JtConfig::default());
        for i in 0..1000 {
            let v = model.at(i as f64 * 0.05);
            assert!((0.99 - 1e-15..=1.01 + 1e-15).contains(&v), "T={v}");
        }
    }

    #[test]
    fn test_quarter_period_peak() {
        let model = TemperatureModel::new(0.2, 2.0);
        let t = std::f64::consts::FRAC_PI_4;
        assert!((model.at(t) - 1.2).abs() < 1e-12);
    }
}
