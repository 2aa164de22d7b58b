use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Record – one row of the energy table
// ---------------------------------------------------------------------------

/// A single observation: one country (or region) in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Grouping key, e.g. `"Africa"` or `"Germany"`.
    pub category: String,
    /// Independent axis variable.
    pub year: i32,
    /// Fossil-fuel consumption in terawatt-hours.
    pub value: f64,
}

impl Record {
    pub fn new(category: impl Into<String>, year: i32, value: f64) -> Self {
        Self {
            category: category.into(),
            year,
            value,
        }
    }

    /// The value truncated toward zero, as an integer parse of the column
    /// would read it. Axis domains are computed from this, the plotted line
    /// uses the full `f64`.
    pub fn integer_value(&self) -> i64 {
        self.value.trunc() as i64
    }

    /// Plot coordinates `[year, value]`.
    pub fn point(&self) -> [f64; 2] {
        [self.year as f64, self.value]
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.category, self.year, self.value)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Distinct categories present in a dataset.
pub type CategorySet = BTreeSet<String>;

/// The full parsed dataset with its pre-computed category index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in file order.
    records: Vec<Record>,
    /// Every distinct `category`, used to populate the selector.
    categories: CategorySet,
}

impl Dataset {
    /// Build the category index from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let categories = records.iter().map(|r| r.category.clone()).collect();
        Dataset {
            records,
            categories,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
