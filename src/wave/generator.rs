//! Seeded synthetic instance generation for tests and benchmarks.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use super::instance::{Aisle, Order, ProblemInstance, Units};

/// Parameters of a synthetic instance.
///
/// Ranges are inclusive `(min, max)` pairs. Wave bounds are fractions of
/// the total demand of all orders.
///
/// # Examples
///
/// ```
/// use u_wavepick::wave::GeneratorConfig;
///
/// let instance = GeneratorConfig::default()
///     .with_orders(12)
///     .with_aisles(6)
///     .with_items(8)
///     .with_seed(7)
///     .generate();
/// assert_eq!(instance.order_count(), 12);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub n_orders: usize,
    pub n_aisles: usize,
    pub n_items: usize,
    /// Distinct items per order.
    pub items_per_order: (usize, usize),
    /// Units per demanded item.
    pub order_units: (Units, Units),
    /// Distinct items per aisle.
    pub items_per_aisle: (usize, usize),
    /// Units per stocked item.
    pub aisle_units: (Units, Units),
    /// Wave bounds as `(lower, upper)` fractions of total demand.
    pub wave_fraction: (f64, f64),
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_orders: 20,
            n_aisles: 8,
            n_items: 10,
            items_per_order: (1, 3),
            order_units: (1, 4),
            items_per_aisle: (2, 5),
            aisle_units: (2, 10),
            wave_fraction: (0.05, 0.5),
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    pub fn with_orders(mut self, n: usize) -> Self {
        self.n_orders = n;
        self
    }

    pub fn with_aisles(mut self, n: usize) -> Self {
        self.n_aisles = n;
        self
    }

    pub fn with_items(mut self, n: usize) -> Self {
        self.n_items = n;
        self
    }

    pub fn with_items_per_order(mut self, min: usize, max: usize) -> Self {
        self.items_per_order = (min, max);
        self
    }

    pub fn with_items_per_aisle(mut self, min: usize, max: usize) -> Self {
        self.items_per_aisle = (min, max);
        self
    }

    pub fn with_wave_fraction(mut self, lower: f64, upper: f64) -> Self {
        self.wave_fraction = (lower, upper);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_items == 0 {
            return Err("n_items must be positive".into());
        }
        for (name, (lo, hi)) in [
            ("items_per_order", self.items_per_order),
            ("items_per_aisle", self.items_per_aisle),
        ] {
            if lo == 0 || lo > hi {
                return Err(format!("{name} must satisfy 0 < min <= max, got ({lo}, {hi})"));
            }
        }
        for (name, (lo, hi)) in [
            ("order_units", self.order_units),
            ("aisle_units", self.aisle_units),
        ] {
            if lo == 0 || lo > hi {
                return Err(format!("{name} must satisfy 0 < min <= max, got ({lo}, {hi})"));
            }
        }
        let (lower, upper) = self.wave_fraction;
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower > upper {
            return Err(format!(
                "wave_fraction must satisfy 0 <= lower <= upper <= 1, got ({lower}, {upper})"
            ));
        }
        Ok(())
    }

    /// Generates the instance.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn generate(&self) -> ProblemInstance {
        self.validate().expect("invalid GeneratorConfig");

        let mut rng = StdRng::seed_from_u64(self.seed);

        let orders: Vec<Order> = (0..self.n_orders)
            .map(|_| {
                Order::new(random_items(
                    &mut rng,
                    self.n_items,
                    self.items_per_order,
                    self.order_units,
                ))
            })
            .collect();

        let aisles: Vec<Aisle> = (0..self.n_aisles)
            .map(|_| {
                Aisle::new(random_items(
                    &mut rng,
                    self.n_items,
                    self.items_per_aisle,
                    self.aisle_units,
                ))
            })
            .collect();

        let total: Units = orders.iter().map(Order::total).sum();
        let lower = (total as f64 * self.wave_fraction.0).floor() as Units;
        let upper = ((total as f64 * self.wave_fraction.1).ceil() as Units).max(lower);

        ProblemInstance::new(orders, aisles, self.n_items, lower, upper)
    }
}

fn random_items(
    rng: &mut StdRng,
    n_items: usize,
    count: (usize, usize),
    units: (Units, Units),
) -> Vec<(usize, Units)> {
    let k = rng.random_range(count.0..=count.1).min(n_items);
    sample(&mut *rng, n_items, k)
        .into_iter()
        .map(|item| (item, rng.random_range(units.0..=units.1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let config = GeneratorConfig::default().with_seed(11);
        assert_eq!(config.generate(), config.generate());
    }

    #[test]
    fn test_generate_shape() {
        let instance = GeneratorConfig::default()
            .with_orders(15)
            .with_aisles(4)
            .with_items(6)
            .generate();
        assert_eq!(instance.order_count(), 15);
        assert_eq!(instance.aisle_count(), 4);
        assert!(instance.validate().is_ok());
        assert!(instance.orders.iter().all(|o| o.total() > 0));
        assert!(instance.wave_size_lb <= instance.wave_size_ub);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        assert!(GeneratorConfig::default()
            .with_items_per_order(3, 1)
            .validate()
            .is_err());
        assert!(GeneratorConfig::default()
            .with_wave_fraction(0.8, 0.2)
            .validate()
            .is_err());
        assert!(GeneratorConfig::default().with_items(0).validate().is_err());
    }
}
