use std::time::Duration;

use crate::data::domain::AxisDomain;

// ---------------------------------------------------------------------------
// Render binder boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Years, along the bottom.
    X,
    /// Consumption, along the left.
    Y,
}

/// How tick labels on an axis are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Whole numbers with no thousands separator (`1965`, not `1,965`).
    Plain,
    /// Up to six decimals, trailing zeros trimmed.
    Auto,
}

impl TickFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            TickFormat::Plain => format!("{}", value.round() as i64),
            TickFormat::Auto => {
                let s = format!("{value:.6}");
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinding {
    pub axis: Axis,
    pub domain: AxisDomain,
    pub ticks: TickFormat,
    pub duration: Duration,
}

/// The drawing surface the selection controller pushes each chart state to.
///
/// Every call replaces the previous target for that element; an animation
/// still in flight is superseded, never queued.
pub trait RenderBinder {
    /// Establish or animate the linear mapping of one axis.
    fn bind_axis(&mut self, binding: AxisBinding);

    /// Retarget the line path to `points` (`[year, value]`).
    fn bind_line(&mut self, points: &[[f64; 2]], duration: Duration);

    /// Retarget the point markers to `points`.
    fn bind_points(&mut self, points: &[[f64; 2]], duration: Duration);

    /// The pointer entered marker `index` of the current series.
    fn on_hover(&mut self, index: usize);

    /// The pointer left every marker.
    fn on_hover_end(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ticks_have_no_separator() {
        assert_eq!(TickFormat::Plain.format(1965.0), "1965");
        assert_eq!(TickFormat::Plain.format(2021.9999), "2022");
        assert_eq!(TickFormat::Auto.format(12.5), "12.5");
        assert_eq!(TickFormat::Auto.format(800.0), "800");
        assert_eq!(TickFormat::Auto.format(0.1 + 0.2), "0.3");
    }
}
