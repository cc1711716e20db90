use chrono::{DateTime, Utc};

/// Which side of its point a marker label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelPlacement {
    Above,
    Below,
}

impl LabelPlacement {
    /// Placement for the sample at `index` in the full hourly series.
    ///
    /// Keyed on the absolute index, not the marker's position in the selection, so
    /// the pattern does not change when the stride does.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            LabelPlacement::Above
        } else {
            LabelPlacement::Below
        }
    }
}

/// An annotated sample on a point plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position of the sample in the source series.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Value and time, separated by a newline.
    pub label: String,
    pub placement: LabelPlacement,
}
