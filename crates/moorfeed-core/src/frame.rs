//! Columnar observation frames.
//!
//! A [`ParameterFrame`] is the common currency between the feed crates and
//! the database uploader: a time-sorted column of observation timestamps
//! plus one value column per [`Parameter`]. Missing values are `NaN`.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parameter::Parameter;

// ============================================================================
// DateRange
// ============================================================================

/// A closed datetime range, as used in database window queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First instant of the range.
    pub start: NaiveDateTime,
    /// Last instant of the range.
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(Error::validation_field(
                "date_range",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Returns the range with `delta` added to the end.
    ///
    /// Window queries use `BETWEEN`, so the end is padded to make sure the
    /// boundary observations are captured.
    pub fn pad_end(self, delta: TimeDelta) -> Self {
        Self {
            start: self.start,
            end: self.end + delta,
        }
    }

    /// The start of the range floored to midnight, the lower bound used by
    /// window queries.
    pub fn window_start(&self) -> NaiveDateTime {
        self.start.date().and_time(NaiveTime::MIN)
    }

    /// The end of the range truncated to the minute, the upper bound used
    /// by window queries.
    pub fn window_end(&self) -> NaiveDateTime {
        self.end
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(self.end)
    }
}

// ============================================================================
// ParameterFrame
// ============================================================================

/// Time-sorted observations for one station: a timestamp column plus one
/// `f64` column per parameter (`NaN` = missing).
///
/// # Invariants
///
/// - Timestamps are strictly increasing (duplicates dropped, first kept).
/// - Every value column has exactly one entry per timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterFrame {
    times: Vec<NaiveDateTime>,
    columns: BTreeMap<Parameter, Vec<f64>>,
}

impl ParameterFrame {
    /// Builds a frame from rows of `(time, values)`.
    ///
    /// `values` in each row must line up with `parameters`. Rows are sorted
    /// by time; when several rows share a timestamp, the first one in input
    /// order wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use moorfeed_core::{Parameter, ParameterFrame};
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// let frame = ParameterFrame::from_rows(
    ///     &[Parameter::SeaSurfaceTemperature],
    ///     vec![
    ///         (day.and_hms_opt(1, 0, 0).unwrap(), vec![14.2]),
    ///         (day.and_hms_opt(0, 0, 0).unwrap(), vec![14.1]),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(frame.len(), 2);
    /// assert_eq!(frame.column(Parameter::SeaSurfaceTemperature).unwrap()[0], 14.1);
    /// ```
    pub fn from_rows(
        parameters: &[Parameter],
        rows: Vec<(NaiveDateTime, Vec<f64>)>,
    ) -> Result<Self> {
        let mut indexed: Vec<(usize, NaiveDateTime, Vec<f64>)> = Vec::with_capacity(rows.len());
        for (i, (time, values)) in rows.into_iter().enumerate() {
            if values.len() != parameters.len() {
                return Err(Error::validation(format!(
                    "row {i} has {} values for {} parameters",
                    values.len(),
                    parameters.len()
                )));
            }
            indexed.push((i, time, values));
        }
        // Stable on input order, so duplicate timestamps keep their first
        // occurrence after the adjacent dedup below.
        indexed.sort_by_key(|(i, time, _)| (*time, *i));
        indexed.dedup_by_key(|(_, time, _)| *time);

        let mut times = Vec::with_capacity(indexed.len());
        let mut columns: BTreeMap<Parameter, Vec<f64>> = parameters
            .iter()
            .map(|p| (*p, Vec::with_capacity(indexed.len())))
            .collect();
        if columns.len() != parameters.len() {
            return Err(Error::validation("duplicate parameter in frame"));
        }
        for (_, time, values) in indexed {
            times.push(time);
            for (parameter, value) in parameters.iter().zip(values) {
                if let Some(column) = columns.get_mut(parameter) {
                    column.push(value);
                }
            }
        }
        Ok(Self { times, columns })
    }

    /// Number of observation rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// `true` when the frame holds no observations.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The sorted observation timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// The parameters this frame carries, in stable order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.columns.keys().copied().collect()
    }

    /// The value column for a parameter, if present.
    pub fn column(&self, parameter: Parameter) -> Option<&[f64]> {
        self.columns.get(&parameter).map(Vec::as_slice)
    }

    /// The exact time span of the frame, `None` when empty.
    pub fn date_range(&self) -> Option<DateRange> {
        Some(DateRange {
            start: *self.times.first()?,
            end: *self.times.last()?,
        })
    }

    /// Timestamped values for a parameter, keeping only finite,
    /// strictly-positive readings.
    ///
    /// The feeds use non-positive sentinels for bad sensor data, so only
    /// values `> 0` are eligible for upload.
    pub fn positive_series(&self, parameter: Parameter) -> Vec<(NaiveDateTime, f64)> {
        let Some(column) = self.columns.get(&parameter) else {
            return Vec::new();
        };
        self.times
            .iter()
            .zip(column)
            .filter(|(_, v)| v.is_finite() && **v > 0.0)
            .map(|(t, v)| (*t, *v))
            .collect()
    }

    /// Appends another frame with the same parameter set, re-sorting and
    /// deduplicating timestamps (existing rows win over appended ones).
    pub fn merge(&mut self, other: ParameterFrame) -> Result<()> {
        if self.columns.keys().ne(other.columns.keys()) {
            return Err(Error::validation("cannot merge frames with different parameters"));
        }
        let parameters = self.parameters();
        let mut rows: Vec<(NaiveDateTime, Vec<f64>)> = Vec::with_capacity(self.len() + other.len());
        for frame in [&*self, &other] {
            for (i, time) in frame.times.iter().enumerate() {
                let values = parameters
                    .iter()
                    .filter_map(|p| frame.columns.get(p).map(|c| c[i]))
                    .collect();
                rows.push((*time, values));
            }
        }
        *self = Self::from_rows(&parameters, rows)?;
        Ok(())
    }
}
