//! Session controller.
//!
//! A [`Session`] owns the loaded dataset, the current filter inputs, and
//! the layers last built from them. Input changes re-run filter and
//! present against the in-memory dataset. Fetching is left to the caller,
//! which brackets it with [`Session::begin_loading`] and
//! [`Session::replace_dataset`] so no lock is held across the request.

use chrono::NaiveDate;
use crime_heatmap_layers::{filter, present, summarize};
use crime_heatmap_layers_models::{CategoryFilter, Presentation, Summary};
use crime_heatmap_server_models::{FilterInputs, FilterUpdate, SessionView};
use crime_heatmap_source_models::{Dataset, Incident};

/// Banner shown while synthetic data is on display.
pub const DEMO_DATA_NOTICE: &str =
    "Using demonstration data. Real-time data may not be available.";

/// State for one map page.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Option<Dataset>,
    inputs: FilterInputs,
    inputs_customized: bool,
    filtered: Vec<Incident>,
    presentation: Presentation,
    stats: Summary,
    loads_in_flight: usize,
}

impl Session {
    /// Creates a session with the default date range ending `today` and no
    /// data yet. The session reports itself as loading until a dataset is
    /// installed.
    #[must_use]
    pub fn pending(today: NaiveDate) -> Self {
        Self {
            dataset: None,
            inputs: FilterInputs::default_for(today),
            inputs_customized: false,
            filtered: Vec::new(),
            presentation: Presentation::default(),
            stats: Summary::default(),
            loads_in_flight: 0,
        }
    }

    /// Creates a session over an already loaded dataset.
    #[must_use]
    pub fn with_dataset(today: NaiveDate, dataset: Dataset) -> Self {
        let mut session = Self::pending(today);
        session.replace_dataset(dataset, today);
        session
    }

    /// Marks a load as in progress. The current dataset stays visible
    /// until [`Self::replace_dataset`] installs the new one.
    pub const fn begin_loading(&mut self) {
        self.loads_in_flight += 1;
    }

    /// Installs a freshly loaded dataset, replacing the previous one
    /// wholesale, and rebuilds the layers.
    ///
    /// Completes one load started with [`Self::begin_loading`]. Unless the
    /// user has changed the filter, the date range is re-anchored to end
    /// `today`.
    pub fn replace_dataset(&mut self, dataset: Dataset, today: NaiveDate) {
        if !self.inputs_customized {
            self.inputs = FilterInputs::default_for(today);
        }
        self.dataset = Some(dataset);
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        self.refresh();
    }

    /// Whether a load is running or no dataset has arrived yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loads_in_flight > 0 || self.dataset.is_none()
    }

    /// Applies a change to the filter inputs and rebuilds the layers.
    pub fn apply(&mut self, update: FilterUpdate) {
        self.inputs.apply(update);
        self.inputs_customized = true;
        self.refresh();
    }

    /// Changes the category selector.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.apply(FilterUpdate {
            category: Some(category),
            ..FilterUpdate::default()
        });
    }

    /// Changes the "from" date input.
    pub fn set_date_from(&mut self, date: NaiveDate) {
        self.apply(FilterUpdate {
            date_from: Some(date),
            ..FilterUpdate::default()
        });
    }

    /// Changes the "to" date input.
    pub fn set_date_to(&mut self, date: NaiveDate) {
        self.apply(FilterUpdate {
            date_to: Some(date),
            ..FilterUpdate::default()
        });
    }

    /// All loaded incidents, empty before the first load.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        self.dataset
            .as_ref()
            .map(|d| d.incidents.as_slice())
            .unwrap_or_default()
    }

    /// Incidents passing the current filter.
    #[must_use]
    pub fn filtered(&self) -> &[Incident] {
        &self.filtered
    }

    /// The layers built for the current filter.
    #[must_use]
    pub const fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Snapshot of everything the page renders.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let is_synthetic = self.dataset.as_ref().is_some_and(Dataset::is_synthetic);
        SessionView {
            origin: self.dataset.as_ref().map(|d| d.origin),
            loading: self.is_loading(),
            notice: is_synthetic.then(|| DEMO_DATA_NOTICE.to_string()),
            filter: self.inputs.clone(),
            presentation: self.presentation.clone(),
            stats: self.stats,
        }
    }

    fn refresh(&mut self) {
        let all = self.incidents();
        let filtered = filter(all, &self.inputs.criteria());
        let presentation = present(&filtered);
        // The stats panel falls back to the full dataset when nothing
        // matches the filter.
        let stats = if filtered.is_empty() {
            summarize(all)
        } else {
            presentation.summary
        };

        self.filtered = filtered;
        self.presentation = presentation;
        self.stats = stats;
    }
}
