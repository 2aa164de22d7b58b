use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Category filter: which records make up the displayed series
// ---------------------------------------------------------------------------

/// Upper limit on observations per series, one per year of the fixed
/// historical span.
pub const MAX_OBSERVATIONS: usize = 38;

/// The records of one category currently driving the chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView {
    pub category: String,
    pub records: Vec<Record>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plot coordinates for every record, in view order.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.records.iter().map(Record::point).collect()
    }
}

/// Collect the records whose category equals `category`, in dataset order,
/// keeping at most `cap` of them.
///
/// An unknown category is not an error: the view is simply empty.
pub fn filter_category(dataset: &Dataset, category: &str, cap: usize) -> FilteredView {
    let records = dataset
        .records()
        .iter()
        .filter(|r| r.category == category)
        .take(cap)
        .cloned()
        .collect();

    FilteredView {
        category: category.to_string(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interleaved(countries: &[&str], years: std::ops::Range<i32>) -> Dataset {
        let mut records = Vec::new();
        for year in years {
            for (i, c) in countries.iter().enumerate() {
                records.push(Record::new(*c, year, (year - 1900) as f64 * (i + 1) as f64));
            }
        }
        Dataset::from_records(records)
    }

    #[test]
    fn keeps_only_matching_records_in_order() {
        let ds = interleaved(&["Africa", "Asia", "Europe"], 1965..1975);
        let view = filter_category(&ds, "Asia", MAX_OBSERVATIONS);

        assert_eq!(view.category, "Asia");
        assert_eq!(view.len(), 10);
        assert!(view.records.iter().all(|r| r.category == "Asia"));
        let years: Vec<i32> = view.records.iter().map(|r| r.year).collect();
        assert_eq!(years, (1965..1975).collect::<Vec<_>>());
    }

    #[test]
    fn truncates_to_cap() {
        let ds = interleaved(&["Africa", "Asia"], 1965..2023);
        let view = filter_category(&ds, "Africa", MAX_OBSERVATIONS);

        assert_eq!(view.len(), 38);
        assert_eq!(view.records.first().map(|r| r.year), Some(1965));
        assert_eq!(view.records.last().map(|r| r.year), Some(2002));
    }

    #[test]
    fn unknown_category_is_empty_not_error() {
        let ds = interleaved(&["Africa"], 1965..1970);
        let view = filter_category(&ds, "Atlantis", MAX_OBSERVATIONS);
        assert!(view.is_empty());
        assert_eq!(view.category, "Atlantis");
    }

    #[test]
    fn leaves_dataset_untouched() {
        let ds = interleaved(&["Africa", "Asia"], 1965..1970);
        let before = ds.records().to_vec();
        let _ = filter_category(&ds, "Asia", 2);
        assert_eq!(ds.records(), before.as_slice());
    }

    #[test]
    fn points_follow_records() {
        let ds = Dataset::from_records(vec![
            Record::new("Africa", 1965, 10.5),
            Record::new("Africa", 1966, 11.25),
        ]);
        let view = filter_category(&ds, "Africa", MAX_OBSERVATIONS);
        assert_eq!(view.points(), vec![[1965.0, 10.5], [1966.0, 11.25]]);
    }
}
