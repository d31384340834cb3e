//! Date-range filtering of loaded items.

use chrono::NaiveDate;

/// An inclusive calendar-day range; either bound may be open.
///
/// Comparison happens on UTC calendar days, so an item stamped anywhere
/// within the `end` day still matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    /// Inclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    /// Creates a filter from two optional bounds.
    #[must_use]
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parses `YYYY-MM-DD` bounds; `None` or an empty string means open.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    /// Whether both bounds are open (matches everything).
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` lies within the range, inclusive on both ends.
    #[must_use]
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDate>, chrono::ParseError> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<NaiveDate>().map(Some),
    }
}
