use std::ops::Index;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::parallel::*;
use crate::types::Timestamp;

pub const HOURS_PER_YEAR: usize = 8760;
pub const HOURS_PER_LEAP_YEAR: usize = 8784;

pub fn hours_per_year(is_leap_year: bool) -> usize {
    if is_leap_year {
        HOURS_PER_LEAP_YEAR
    } else {
        HOURS_PER_YEAR
    }
}

pub fn days_in_months(is_leap_year: bool) -> [u32; 12] {
    [
        31,
        if is_leap_year { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

// Any fixed year works; only the leap flag matters.
fn reference_year(is_leap_year: bool) -> i32 {
    if is_leap_year {
        2016
    } else {
        2017
    }
}

pub fn is_valid_date(month: u32, day: u32, is_leap_year: bool) -> bool {
    NaiveDate::from_ymd_opt(reference_year(is_leap_year), month, day).is_some()
}

pub fn day_of_year(month: u32, day: u32, is_leap_year: bool) -> u32 {
    let dim = days_in_months(is_leap_year);
    let before: u32 = dim[..(month.clamp(1, 12) - 1) as usize].iter().sum();
    before + day
}

pub fn doy_to_month_day(doy: u32, is_leap_year: bool) -> (u32, u32) {
    match NaiveDate::from_yo_opt(reference_year(is_leap_year), doy) {
        Some(date) => (date.month(), date.day()),
        None => (12, 31),
    }
}

pub fn validate_timestep(timestep: u32) -> Result<()> {
    if timestep == 0 || 60 % timestep != 0 {
        return Err(Error::InvalidTimestep(timestep));
    }
    Ok(())
}

pub fn series_length(timestep: u32, is_leap_year: bool) -> usize {
    hours_per_year(is_leap_year) * timestep as usize
}

pub fn timestamp_at(index: usize, timestep: u32, is_leap_year: bool) -> Timestamp {
    let timestep = timestep.max(1) as usize;
    let per_day = 24 * timestep;
    let (month, day) = doy_to_month_day((index / per_day) as u32 + 1, is_leap_year);
    let within_day = index % per_day;
    Timestamp {
        month,
        day,
        hour: (within_day / timestep) as u32,
        minute: ((within_day % timestep) * 60 / timestep) as u32,
    }
}

/// Index of the sample at `month/day` and `float_hour`, if it lands on the grid.
pub fn sample_index(
    month: u32,
    day: u32,
    float_hour: f64,
    timestep: u32,
    is_leap_year: bool,
) -> Option<usize> {
    if !is_valid_date(month, day, is_leap_year) || !(0.0..24.0).contains(&float_hour) {
        return None;
    }
    let step = float_hour * timestep as f64;
    let rounded = step.round();
    if (step - rounded).abs() > 0.05 {
        return None;
    }
    let day_index = (day_of_year(month, day, is_leap_year) - 1) as usize;
    Some(day_index * 24 * timestep as usize + rounded as usize)
}

/// Evaluates `f` for every sample of a year. Execution order is unspecified,
/// the returned vector is in index order.
pub(crate) fn evaluate<T, F>(timestep: u32, is_leap_year: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, Timestamp) -> T + Sync + Send,
{
    (0..series_length(timestep, is_leap_year))
        .into_par_iter()
        .map(|i| f(i, timestamp_at(i, timestep, is_leap_year)))
        .collect()
}

/// A year of samples at `timestep` samples per hour.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualTimeSeries {
    values: Vec<f64>,
    timestep: u32,
    is_leap_year: bool,
}

impl AnnualTimeSeries {
    pub fn new(values: Vec<f64>, timestep: u32, is_leap_year: bool) -> Result<Self> {
        validate_timestep(timestep)?;
        let expected = series_length(timestep, is_leap_year);
        if values.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: values.len(),
                timestep,
                is_leap_year,
            });
        }
        Ok(Self {
            values,
            timestep,
            is_leap_year,
        })
    }

    pub fn zeros(timestep: u32, is_leap_year: bool) -> Result<Self> {
        validate_timestep(timestep)?;
        Self::new(
            vec![0.0; series_length(timestep, is_leap_year)],
            timestep,
            is_leap_year,
        )
    }

    pub fn from_fn<F>(timestep: u32, is_leap_year: bool, f: F) -> Result<Self>
    where
        F: Fn(usize, Timestamp) -> f64 + Sync + Send,
    {
        validate_timestep(timestep)?;
        Self::new(evaluate(timestep, is_leap_year, f), timestep, is_leap_year)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestep(&self) -> u32 {
        self.timestep
    }

    pub fn is_leap_year(&self) -> bool {
        self.is_leap_year
    }

    pub fn get(&self, index: usize) -> Option<(f64, Timestamp)> {
        let value = *self.values.get(index)?;
        Some((value, timestamp_at(index, self.timestep, self.is_leap_year)))
    }

    pub fn timestamp(&self, index: usize) -> Option<Timestamp> {
        (index < self.values.len()).then(|| timestamp_at(index, self.timestep, self.is_leap_year))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        (0..self.values.len()).map(|i| timestamp_at(i, self.timestep, self.is_leap_year))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn is_aligned_with(&self, other: &Self) -> bool {
        self.timestep == other.timestep
            && self.is_leap_year == other.is_leap_year
            && self.values.len() == other.values.len()
    }

    pub fn ensure_aligned(&self, other: &Self) -> Result<()> {
        if self.is_aligned_with(other) {
            return Ok(());
        }
        Err(Error::SeriesMismatch(format!(
            "{} values at timestep {} (leap year: {}) vs {} values at timestep {} (leap year: {})",
            self.values.len(),
            self.timestep,
            self.is_leap_year,
            other.values.len(),
            other.timestep,
            other.is_leap_year
        )))
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            values: self.values.iter().map(|&v| f(v)).collect(),
            timestep: self.timestep,
            is_leap_year: self.is_leap_year,
        }
    }

    pub fn zip_with<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_aligned(other)?;
        Ok(Self {
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            timestep: self.timestep,
            is_leap_year: self.is_leap_year,
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }
}

impl Index<usize> for AnnualTimeSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a AnnualTimeSeries {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_years() {
        assert!(!is_valid_date(2, 29, false));
        assert!(is_valid_date(2, 29, true));
        assert!(!is_valid_date(13, 1, true));
    }

    #[test]
    fn test_sample_index_off_grid() {
        assert_eq!(sample_index(1, 1, 0.5, 1, false), None);
        assert_eq!(sample_index(1, 1, 0.5, 2, false), Some(1));
        assert_eq!(sample_index(1, 1, 24.0, 1, false), None);
        assert_eq!(sample_index(2, 29, 0.0, 1, false), None);
    }

    #[test]
    fn test_evaluate_keeps_index_order() {
        let out = evaluate(1, false, |i, _| i);
        assert_eq!(out.len(), HOURS_PER_YEAR);
        assert!(out.iter().enumerate().all(|(i, &v)| i == v));
    }
}
