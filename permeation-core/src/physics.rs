use crate::constants::K_B;
use permeation_schemas::property::MaterialProperty;

/// Evaluates `pre_exponential * exp(-activation_energy / (k_B * T))`.
pub fn arrhenius(pre_exponential: f64, activation_energy: f64, temperature: f64) -> f64 {
    pre_exponential * (-activation_energy / (K_B * temperature)).exp()
}

pub trait ArrheniusLaw {
    fn value_at(&self, temperature: f64) -> f64;
}

impl ArrheniusLaw for MaterialProperty {
    fn value_at(&self, temperature: f64) -> f64 {
        arrhenius(self.pre_exponential_factor, self.activation_energy, temperature)
    }
}

/// Subsurface concentration from Sieverts' law, `S(T) * sqrt(P)`.
pub fn sieverts_concentration(solubility: &MaterialProperty, pressure: f64, temperature: f64) -> f64 {
    solubility.value_at(temperature) * pressure.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_activation_energy_returns_prefactor() {
        assert_relative_eq!(arrhenius(3.2e-7, 0.0, 450.0), 3.2e-7);
    }

    #[test]
    fn test_arrhenius_positive_and_decreasing_towards_zero_kelvin() {
        let pairs = [(1.0e-7, 0.2), (4.9e-1, 0.06), (2.0e-6, 1.1), (5.0e3, 0.45)];
        let temperatures = [1200.0, 900.0, 673.15, 573.15, 300.0, 120.0, 40.0];

        for (d0, e) in pairs {
            let mut previous = f64::INFINITY;
            for t in temperatures {
                let value = arrhenius(d0, e, t);
                assert!(value > 0.0, "value at {t} K must be positive, got {value}");
                assert!(value < previous, "value must fall as T drops: {value} >= {previous}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_arrhenius_is_monotonic_in_inverse_temperature() {
        let property = MaterialProperty { pre_exponential_factor: 2.0e-7, activation_energy: 0.5 };
        let t1 = 500.0;
        let t2 = 700.0;
        let slope = (property.value_at(t2).ln() - property.value_at(t1).ln()) / (1.0 / t2 - 1.0 / t1);
        assert_relative_eq!(slope, -0.5 / K_B, max_relative = 1e-9);
    }

    #[test]
    fn test_sieverts_scales_with_square_root_of_pressure() {
        let solubility = MaterialProperty { pre_exponential_factor: 0.5, activation_energy: 0.1 };
        let c1 = sieverts_concentration(&solubility, 1.0e4, 600.0);
        let c4 = sieverts_concentration(&solubility, 4.0e4, 600.0);
        assert_relative_eq!(c4 / c1, 2.0, max_relative = 1e-12);
    }
}
