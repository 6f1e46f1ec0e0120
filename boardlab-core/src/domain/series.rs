//! Series validation.
//!
//! Bars must be strictly ordered by date (one bar per date), lie inside the
//! analysis window and carry finite values. A violation is malformed input
//! and aborts the run.

use chrono::NaiveDate;
use thiserror::Error;

/// Anything carrying a trading date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Numeric fields of a record, by name.
pub trait Measured {
    fn fields(&self) -> Vec<(&'static str, f64)>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("series '{id}' is out of order at index {index}: {date} does not follow {previous}")]
    OutOfOrder {
        id: String,
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("series '{id}' has bar dated {date} outside window {start}..={end}")]
    OutsideWindow {
        id: String,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("series '{id}' has non-finite {field} at index {index}")]
    NonFinite {
        id: String,
        index: usize,
        field: &'static str,
    },
}

/// Reject NaN and infinite values in any record.
pub fn check_finite<T: Measured>(id: &str, records: &[T]) -> Result<(), SeriesError> {
    for (index, record) in records.iter().enumerate() {
        if let Some((field, _)) = record.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite {
                id: id.to_string(),
                index,
                field,
            });
        }
    }
    Ok(())
}

/// Check ordering, window membership and finiteness of a single series.
pub fn check_series<T: Dated + Measured>(
    id: &str,
    bars: &[T],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), SeriesError> {
    let mut previous: Option<NaiveDate> = None;
    for (index, bar) in bars.iter().enumerate() {
        let date = bar.date();
        if date < start || date > end {
            return Err(SeriesError::OutsideWindow {
                id: id.to_string(),
                date,
                start,
                end,
            });
        }
        if let Some(prev) = previous {
            if date <= prev {
                return Err(SeriesError::OutOfOrder {
                    id: id.to_string(),
                    index,
                    previous: prev,
                    date,
                });
            }
        }
        previous = Some(date);
    }
    check_finite(id, bars)
}
