use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::ChartColors;
use crate::config::ChartConfig;
use crate::controller::SelectionController;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::error::ChartError;
use crate::ui::plot::PlotBinder;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ChartConfig,

    /// Resolved line / marker colours.
    pub colors: ChartColors,

    /// Loaded dataset and current selection (None until a file loads).
    pub controller: Option<SelectionController>,

    /// Animated plot state the controller renders into.
    pub binder: PlotBinder,

    /// File the current dataset came from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ChartConfig) -> Self {
        let colors = config.chart_colors().unwrap_or_else(|e| {
            log::warn!("{e}; falling back to default colours");
            ChartColors::default()
        });
        let binder = Self::fresh_binder(&config);
        Self {
            config,
            colors,
            controller: None,
            binder,
            source: None,
            status_message: None,
        }
    }

    fn fresh_binder(config: &ChartConfig) -> PlotBinder {
        PlotBinder::new(config.ease, Duration::from_millis(config.tooltip_fade_ms))
    }

    /// Load `path` and show its default category; failures land in the
    /// status line.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path, &self.config.load_options()) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                let err = ChartError::DataLoad(format!("{}: {e:#}", path.display()));
                log::error!("{err}");
                self.status_message = Some(format!("Error: {err}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and render the initial selection.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        let controller = SelectionController::new(
            dataset,
            self.config.max_observations,
            self.config.year_domain,
            Duration::from_millis(self.config.transition_ms),
        );
        let initial = controller.initial_category(&self.config.default_category);

        self.controller = Some(controller);
        self.binder = Self::fresh_binder(&self.config);
        self.source = Some(source);
        self.status_message = None;

        match initial {
            Some(category) => self.select_category(&category),
            None => self.status_message = Some("Dataset has no records".into()),
        }
    }

    /// React to the selector: recompute and re-render for `category`.
    pub fn select_category(&mut self, category: &str) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.select(category, &mut self.binder) {
            Ok(_) => self.status_message = None,
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.controller.as_ref()?.selected()
    }
}
