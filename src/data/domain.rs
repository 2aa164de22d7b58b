use crate::error::ChartError;

use super::filter::FilteredView;
use super::model::Record;

// ---------------------------------------------------------------------------
// Axis domain for the value axis
// ---------------------------------------------------------------------------

/// `[lower, upper]` range a numeric axis is scaled to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    pub lower: f64,
    pub upper: f64,
}

impl AxisDomain {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Value-axis domain for a view: `[0, upper_bound(view)]`.
    pub fn for_view(view: &FilteredView) -> Result<Self, ChartError> {
        let upper = upper_bound(view, Record::integer_value)?;
        Ok(Self::new(0.0, upper as f64))
    }
}

/// Round the maximum of `field` over the view up to the next multiple of its
/// leading power of ten: 734 → 800, 1250 → 2000, 0 → 0.
pub fn upper_bound<F>(view: &FilteredView, field: F) -> Result<i64, ChartError>
where
    F: Fn(&Record) -> i64,
{
    let max = view
        .records
        .iter()
        .map(field)
        .max()
        .ok_or_else(|| ChartError::empty_category(&view.category))?;

    round_to_leading_digit(max)
}

/// Ceiling of `max` to a multiple of `10^(digits(max) - 1)`. A negative
/// maximum gives 0, so the bound never falls below the axis floor.
pub fn round_to_leading_digit(max: i64) -> Result<i64, ChartError> {
    if max < 0 {
        return Ok(0);
    }
    let digits = decimal_digits(max);
    let scale = 10i64.pow(digits - 1);

    let quotient = max / scale;
    let quotient = if max % scale > 0 { quotient + 1 } else { quotient };

    quotient
        .checked_mul(scale)
        .ok_or(ChartError::DomainOverflow(max))
}

/// Number of decimal digits of `|n|`; zero has one digit.
fn decimal_digits(n: i64) -> u32 {
    n.unsigned_abs().checked_ilog10().map_or(1, |d| d + 1)
}
