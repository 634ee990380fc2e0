//! Radiance WEA text format and its HRS companion index.
//!
//! ```text
//! place Chicago
//! latitude 41.98
//! longitude 87.92
//! time_zone 90
//! site_elevation 201.0
//! timestep 1
//! 1 1 8.000 0 0
//! 1 1 9.000 283.5 38.2
//! ```
//!
//! Longitude and time zone are west positive. Spaces in the place name are
//! written as underscores and read back as spaces. Only the rows that were
//! written are present; every other sample reads back as zero.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::series::{sample_index, series_length, timestamp_at, validate_timestep};
use crate::types::Location;
use crate::wea::Wea;

const HEADER_KEYS: [&str; 6] = [
    "place",
    "latitude",
    "longitude",
    "time_zone",
    "site_elevation",
    "timestep",
];

/// Fixed point with at most 3 decimals, trailing zeros trimmed.
pub fn format_value(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

struct WeaRow {
    line: usize,
    month: u32,
    day: u32,
    hour: f64,
    direct_normal: f64,
    diffuse_horizontal: f64,
}

struct WeaText {
    location: Location,
    timestep: u32,
    rows: Vec<WeaRow>,
}

impl WeaText {
    fn parse(content: &str) -> Result<Self> {
        let mut header: [Option<&str>; 6] = [None; 6];
        let mut rows = Vec::new();

        for (i, raw) in content.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let (key, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let header_done = header.iter().all(Option::is_some);
            if rows.is_empty() && !header_done && !looks_numeric(key) {
                match HEADER_KEYS.iter().position(|k| *k == key) {
                    Some(slot) => header[slot] = Some(rest.trim()),
                    None => debug!(line = line_no, key, "Ignoring unknown WEA header key"),
                }
                continue;
            }
            rows.push(parse_row(line, line_no)?);
        }

        let field = |slot: usize| {
            header[slot].ok_or_else(|| Error::WeaParse {
                line: 0,
                reason: format!("missing '{}' header", HEADER_KEYS[slot]),
            })
        };
        let number = |slot: usize| -> Result<f64> {
            let value = field(slot)?;
            value.parse::<f64>().map_err(|_| Error::WeaParse {
                line: 0,
                reason: format!("invalid {}: '{value}'", HEADER_KEYS[slot]),
            })
        };

        let timestep_text = field(5)?;
        let timestep = timestep_text.parse::<u32>().map_err(|_| Error::WeaParse {
            line: 0,
            reason: format!("invalid timestep: '{timestep_text}'"),
        })?;

        let location = Location {
            city: field(0)?.replace('_', " "),
            latitude: number(1)?,
            longitude: 0.0 - number(2)?,
            utc_offset: 0.0 - number(3)? / 15.0,
            elevation: number(4)?,
            ..Location::default()
        };

        Ok(Self {
            location,
            timestep,
            rows,
        })
    }

    fn into_wea(self, requested: u32, is_leap_year: bool) -> Result<Wea> {
        validate_timestep(requested)?;
        if requested != self.timestep {
            return Err(Error::TimestepMismatch {
                requested,
                recorded: self.timestep,
            });
        }

        let n = series_length(self.timestep, is_leap_year);
        let mut dni = vec![0.0; n];
        let mut dhi = vec![0.0; n];
        let mut previous: Option<usize> = None;
        let row_count = self.rows.len();

        for row in self.rows {
            let index = sample_index(row.month, row.day, row.hour, self.timestep, is_leap_year)
                .ok_or_else(|| Error::WeaParse {
                    line: row.line,
                    reason: format!(
                        "{}/{} hour {} is not a sample at timestep {}",
                        row.month, row.day, row.hour, self.timestep
                    ),
                })?;
            if previous.is_some_and(|p| index <= p) {
                return Err(Error::WeaParse {
                    line: row.line,
                    reason: "rows out of chronological order or duplicated".to_string(),
                });
            }
            previous = Some(index);
            dni[index] = row.direct_normal;
            dhi[index] = row.diffuse_horizontal;
        }

        debug!(
            city = %self.location.city,
            timestep = self.timestep,
            is_leap_year,
            rows = row_count,
            "Parsed WEA content"
        );
        Wea::from_values(Arc::new(self.location), dni, dhi, self.timestep, is_leap_year)
    }
}

fn looks_numeric(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

fn parse_row(line: &str, line_no: usize) -> Result<WeaRow> {
    let invalid = |reason: String| Error::WeaParse {
        line: line_no,
        reason,
    };
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(invalid(format!("expected 5 columns, found {}", parts.len())));
    }
    let integer = |idx: usize| {
        parts[idx]
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid integer '{}'", parts[idx])))
    };
    let float = |idx: usize| {
        parts[idx]
            .parse::<f64>()
            .map_err(|_| invalid(format!("invalid number '{}'", parts[idx])))
    };
    Ok(WeaRow {
        line: line_no,
        month: integer(0)?,
        day: integer(1)?,
        hour: float(2)?,
        direct_normal: float(3)?,
        diffuse_horizontal: float(4)?,
    })
}

impl Wea {
    /// Reads a WEA file recorded at `timestep`.
    ///
    /// A February 29 row in a file read with `is_leap_year` unset is an error.
    pub fn from_file<P: AsRef<Path>>(path: P, timestep: u32, is_leap_year: bool) -> Result<Self> {
        let path = path.as_ref();
        let wea = WeaText::parse(&fs::read_to_string(path)?)?.into_wea(timestep, is_leap_year)?;
        info!(path = %path.display(), timestep, is_leap_year, "Loaded WEA file");
        Ok(wea)
    }

    pub fn from_wea_str(content: &str, timestep: u32, is_leap_year: bool) -> Result<Self> {
        WeaText::parse(content)?.into_wea(timestep, is_leap_year)
    }

    /// Writes the samples at `hours_of_year` as a WEA file, plus a `.hrs`
    /// index next to it when `write_hours_file` is set.
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        hours_of_year: &[f64],
        write_hours_file: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let indices = self.sample_indices_for(hours_of_year)?;
        let location = self.location();
        let dni = self.direct_normal_irradiance();
        let dhi = self.diffuse_horizontal_irradiance();

        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "place {}", location.city.split_whitespace().collect::<Vec<_>>().join("_"))?;
        writeln!(out, "latitude {:.2}", location.latitude)?;
        writeln!(out, "longitude {:.2}", 0.0 - location.longitude)?;
        writeln!(out, "time_zone {}", format_value(0.0 - 15.0 * location.utc_offset))?;
        writeln!(out, "site_elevation {:.1}", location.elevation)?;
        writeln!(out, "timestep {}", self.timestep())?;

        let mut days: Vec<(u32, u32, Vec<f64>)> = Vec::new();
        for &i in &indices {
            let ts = timestamp_at(i, self.timestep(), self.is_leap_year());
            writeln!(
                out,
                "{} {} {:.3} {} {}",
                ts.month,
                ts.day,
                ts.float_hour(),
                format_value(dni[i]),
                format_value(dhi[i])
            )?;
            if let Some((m, d, hours)) = days.last_mut() {
                if *m == ts.month && *d == ts.day {
                    hours.push(ts.float_hour());
                    continue;
                }
            }
            days.push((ts.month, ts.day, vec![ts.float_hour()]));
        }
        out.flush()?;

        if write_hours_file {
            let hrs_path = path.with_extension("hrs");
            let mut hrs = BufWriter::new(File::create(&hrs_path)?);
            for (month, day, hours) in &days {
                let hours: Vec<String> = hours.iter().map(|&h| format_value(h)).collect();
                writeln!(hrs, "{month} {day} {}", hours.join(" "))?;
            }
            hrs.flush()?;
            debug!(path = %hrs_path.display(), days = days.len(), "Wrote HRS file");
        }

        info!(path = %path.display(), rows = indices.len(), "Wrote WEA file");
        Ok(())
    }

    /// Sorted, de-duplicated sample indices for hours of the year.
    fn sample_indices_for(&self, hours_of_year: &[f64]) -> Result<Vec<usize>> {
        let timestep = self.timestep() as f64;
        let mut indices = hours_of_year
            .iter()
            .map(|&hour| {
                let step = hour * timestep;
                let rounded = step.round();
                if !hour.is_finite() || rounded < 0.0 || (step - rounded).abs() > 0.05 {
                    return Err(Error::InvalidHour(hour));
                }
                let index = rounded as usize;
                if index >= self.len() {
                    return Err(Error::InvalidHour(hour));
                }
                Ok(index)
            })
            .collect::<Result<Vec<usize>>>()?;
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

/// One line of an HRS file.
#[derive(Debug, Clone, PartialEq)]
pub struct HoursEntry {
    pub month: u32,
    pub day: u32,
    pub hours: Vec<f64>,
}

/// The companion index listing which hours of each day a WEA file holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoursFile {
    entries: Vec<HoursEntry>,
}

impl HoursFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let invalid = |token: &str| Error::WeaParse {
                line: i + 1,
                reason: format!("invalid HRS token '{token}'"),
            };
            let mut tokens = line.split_whitespace();
            let mut integer = || -> Result<u32> {
                let token = tokens.next().unwrap_or("");
                token.parse().map_err(|_| invalid(token))
            };
            let month = integer()?;
            let day = integer()?;
            let hours = tokens
                .map(|t| t.parse::<f64>().map_err(|_| invalid(t)))
                .collect::<Result<Vec<f64>>>()?;
            entries.push(HoursEntry { month, day, hours });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[HoursEntry] {
        &self.entries
    }

    /// Number of hours listed across all days.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.hours.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample indices of the listed hours in a year at `timestep`.
    pub fn sample_indices(&self, timestep: u32, is_leap_year: bool) -> Result<Vec<usize>> {
        validate_timestep(timestep)?;
        let mut indices = Vec::with_capacity(self.len());
        for entry in &self.entries {
            for &hour in &entry.hours {
                let index = sample_index(entry.month, entry.day, hour, timestep, is_leap_year)
                    .ok_or(Error::InvalidHour(hour))?;
                indices.push(index);
            }
        }
        Ok(indices)
    }
}
