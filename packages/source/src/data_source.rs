//! Real-or-synthetic incident loading.
//!
//! [`DataSource::load`] runs the fetch step, which yields a typed
//! [`FetchOutcome`], and then [`choose_dataset`] decides between the
//! fetched incidents and synthetic fallback data. Fetch failures never
//! propagate past this module.

use crime_heatmap_source_models::{Dataset, Incident};

use crate::ckan::{CkanFetcher, resolve_base_url};
use crate::source_def::{FieldRules, SourceDefinition};
use crate::synthetic::SyntheticGenerator;
use crate::{RecordFetcher, SourceError};

/// Result of the fetch step.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Records were fetched and normalized (possibly zero of them).
    Fetched(Vec<Incident>),
    /// The fetch failed; no real data is available.
    Failed(SourceError),
}

/// Chooses between fetched incidents and synthetic data.
///
/// Real data is used only when the fetch succeeded and produced at least
/// one incident; otherwise `fallback` is invoked. The result is never a mix
/// of the two.
pub fn choose_dataset(outcome: FetchOutcome, fallback: impl FnOnce() -> Vec<Incident>) -> Dataset {
    match outcome {
        FetchOutcome::Fetched(incidents) if !incidents.is_empty() => {
            log::info!("Loaded {} real crime incidents", incidents.len());
            Dataset::real(incidents)
        }
        FetchOutcome::Fetched(_) => {
            log::info!("No real incidents available, using synthetic data for demonstration");
            Dataset::synthetic(fallback())
        }
        FetchOutcome::Failed(e) => {
            log::error!("Error fetching real crime data: {e}");
            log::info!("Using synthetic data for demonstration");
            Dataset::synthetic(fallback())
        }
    }
}

/// Loads incidents from a [`RecordFetcher`] with synthetic fallback.
pub struct DataSource {
    fetcher: Box<dyn RecordFetcher>,
    rules: FieldRules,
    generator: SyntheticGenerator,
}

impl DataSource {
    /// Creates a data source from its parts.
    #[must_use]
    pub fn new(
        fetcher: Box<dyn RecordFetcher>,
        rules: FieldRules,
        generator: SyntheticGenerator,
    ) -> Self {
        Self {
            fetcher,
            rules,
            generator,
        }
    }

    /// Creates a CKAN-backed data source for `definition`.
    ///
    /// `host` and `port` describe where the application runs and select
    /// between the local development proxy and the public API. An explicit
    /// `base_url_override` bypasses that selection.
    #[must_use]
    pub fn ckan(
        definition: &SourceDefinition,
        host: Option<&str>,
        port: u16,
        base_url_override: Option<String>,
        generator: SyntheticGenerator,
    ) -> Self {
        let base_url = base_url_override
            .unwrap_or_else(|| resolve_base_url(&definition.fetcher, host, port));
        let fetcher = CkanFetcher::new(&definition.fetcher, base_url);
        Self::new(Box::new(fetcher), definition.fields.clone(), generator)
    }

    /// Fetches and normalizes records without applying any fallback.
    pub async fn fetch(&self) -> FetchOutcome {
        match self.fetcher.fetch_records().await {
            Ok(records) => FetchOutcome::Fetched(self.rules.normalize_all(&records)),
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Loads a dataset: real incidents when available, synthetic otherwise.
    pub async fn load(&self) -> Dataset {
        let outcome = self.fetch().await;
        choose_dataset(outcome, || self.generator.generate_default())
    }
}
