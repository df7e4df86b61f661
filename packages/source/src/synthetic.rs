//! Synthetic incident generator.
//!
//! Produces plausible-looking placeholder incidents when real data cannot
//! be fetched. There is no statistical fidelity requirement: coordinates,
//! categories, and timestamps are sampled uniformly.

use chrono::{DateTime, Duration, Utc};
use crime_heatmap_crime_models::{CrimeCategory, IncidentCategory};
use crime_heatmap_source_models::Incident;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::source_def::SyntheticConfig;

/// Generates synthetic incidents inside a configured bounding box.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    config: SyntheticConfig,
    seed: Option<u64>,
}

impl SyntheticGenerator {
    /// Creates a generator that draws from OS entropy on every call.
    #[must_use]
    pub const fn new(config: SyntheticConfig) -> Self {
        Self { config, seed: None }
    }

    /// Creates a generator whose output is identical for identical
    /// `count` and `now` arguments.
    #[must_use]
    pub const fn with_seed(config: SyntheticConfig, seed: u64) -> Self {
        Self {
            config,
            seed: Some(seed),
        }
    }

    /// Number of incidents produced by [`Self::generate_default`].
    #[must_use]
    pub const fn default_count(&self) -> usize {
        self.config.count
    }

    /// Generates the configured default number of incidents.
    #[must_use]
    pub fn generate_default(&self) -> Vec<Incident> {
        self.generate(self.config.count)
    }

    /// Generates `count` incidents spread over the days before now.
    #[must_use]
    pub fn generate(&self, count: usize) -> Vec<Incident> {
        self.generate_at(count, Utc::now())
    }

    /// Generates `count` incidents spread over the days before `now`.
    #[must_use]
    pub fn generate_at(&self, count: usize, now: DateTime<Utc>) -> Vec<Incident> {
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let cfg = &self.config;
        let window_ms = Duration::days(cfg.days_back).num_milliseconds().max(1);
        let categories = CrimeCategory::all();

        (0..count)
            .map(|_| {
                let category = categories[rng.gen_range(0..categories.len())];
                let offset = Duration::milliseconds(rng.gen_range(0..window_ms));

                Incident {
                    latitude: rng.gen_range(cfg.lat_min..cfg.lat_max),
                    longitude: rng.gen_range(cfg.lng_min..cfg.lng_max),
                    category: IncidentCategory::Known(category),
                    occurred_at: now - offset,
                    description: category.to_string(),
                    address: format!(
                        "Calle {} # {}-{}",
                        rng.gen_range(1..=cfg.street_max),
                        rng.gen_range(1..=cfg.block_max),
                        rng.gen_range(1..=cfg.block_max),
                    ),
                    neighborhood: format!("Barrio {}", rng.gen_range(1..=cfg.neighborhood_count)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::source_def::SourceDefinition;

    fn config() -> SyntheticConfig {
        SourceDefinition::bogota().unwrap().synthetic
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn generates_requested_count() {
        let generator = SyntheticGenerator::with_seed(config(), 7);
        assert_eq!(generator.generate_at(42, fixed_now()).len(), 42);
        assert_eq!(generator.generate_default().len(), 500);
    }

    #[test]
    fn incidents_stay_inside_bounds_and_window() {
        let cfg = config();
        let generator = SyntheticGenerator::with_seed(cfg.clone(), 11);
        let now = fixed_now();
        let earliest = now - Duration::days(cfg.days_back);

        for incident in generator.generate_at(500, now) {
            assert!((cfg.lat_min..cfg.lat_max).contains(&incident.latitude));
            assert!((cfg.lng_min..cfg.lng_max).contains(&incident.longitude));
            assert!(incident.occurred_at <= now);
            assert!(incident.occurred_at > earliest);
            assert!(matches!(incident.category, IncidentCategory::Known(_)));
            assert_eq!(incident.description, incident.category.name());
            assert!(incident.address.starts_with("Calle "));
            assert!(incident.neighborhood.starts_with("Barrio "));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let generator = SyntheticGenerator::with_seed(config(), 99);
        assert_eq!(
            generator.generate_at(20, fixed_now()),
            generator.generate_at(20, fixed_now())
        );
    }

    #[test]
    fn zero_count_yields_empty() {
        let generator = SyntheticGenerator::new(config());
        assert!(generator.generate(0).is_empty());
    }
}
