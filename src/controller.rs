use std::time::Duration;

use crate::data::domain::AxisDomain;
use crate::data::filter::{filter_category, FilteredView};
use crate::data::model::{CategorySet, Dataset, Record};
use crate::error::ChartError;
use crate::render::{Axis, AxisBinding, RenderBinder, TickFormat};

// ---------------------------------------------------------------------------
// Chart frame: everything one render cycle needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub view: FilteredView,
    pub domain: AxisDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recomputing,
    Rendering,
}

// ---------------------------------------------------------------------------
// Selection controller
// ---------------------------------------------------------------------------

/// Owns the dataset and the currently displayed frame, and pushes a fresh
/// frame to the binder whenever a category is selected.
pub struct SelectionController {
    dataset: Dataset,
    cap: usize,
    year_domain: AxisDomain,
    transition: Duration,
    phase: Phase,
    frame: Option<ChartFrame>,
}

impl SelectionController {
    pub fn new(dataset: Dataset, cap: usize, year_domain: [i32; 2], transition: Duration) -> Self {
        Self {
            dataset,
            cap,
            year_domain: AxisDomain::new(year_domain[0] as f64, year_domain[1] as f64),
            transition,
            phase: Phase::Idle,
            frame: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn categories(&self) -> &CategorySet {
        self.dataset.categories()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&ChartFrame> {
        self.frame.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.frame.as_ref().map(|f| f.view.category.as_str())
    }

    /// `preferred` if the dataset has it, otherwise the first category.
    pub fn initial_category(&self, preferred: &str) -> Option<String> {
        if self.dataset.contains_category(preferred) {
            return Some(preferred.to_string());
        }
        let fallback = self.categories().iter().next().cloned();
        if let Some(first) = &fallback {
            log::warn!("Default category '{preferred}' not in dataset, showing '{first}'");
        }
        fallback
    }

    /// Recompute the view and domain for `category` and hand them to `binder`.
    ///
    /// On failure the previously displayed frame is kept and the controller
    /// returns to idle.
    pub fn select<B>(&mut self, category: &str, binder: &mut B) -> Result<&ChartFrame, ChartError>
    where
        B: RenderBinder + ?Sized,
    {
        self.phase = Phase::Recomputing;
        let view = filter_category(&self.dataset, category, self.cap);
        let domain = match AxisDomain::for_view(&view) {
            Ok(domain) => domain,
            Err(e) => {
                self.phase = Phase::Idle;
                log::error!("Cannot display '{category}': {e}");
                return Err(e);
            }
        };
        log::info!(
            "Selected '{category}': {} observations, value axis [{}, {}]",
            view.len(),
            domain.lower,
            domain.upper
        );

        self.phase = Phase::Rendering;
        let frame = ChartFrame { view, domain };
        self.render(&frame, binder);

        self.phase = Phase::Idle;
        Ok(self.frame.insert(frame))
    }

    fn render<B>(&self, frame: &ChartFrame, binder: &mut B)
    where
        B: RenderBinder + ?Sized,
    {
        binder.bind_axis(AxisBinding {
            axis: Axis::X,
            domain: self.year_domain,
            ticks: TickFormat::Plain,
            duration: self.transition,
        });
        binder.bind_axis(AxisBinding {
            axis: Axis::Y,
            domain: frame.domain,
            ticks: TickFormat::Auto,
            duration: self.transition,
        });

        let points = frame.view.points();
        binder.bind_line(&points, self.transition);
        binder.bind_points(&points, self.transition);
    }

    /// The record behind marker `index` of the current series.
    pub fn hovered_record(&self, index: usize) -> Option<&Record> {
        self.frame.as_ref()?.view.records.get(index)
    }
}
