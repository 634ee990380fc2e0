//! EnergyPlus weather statistics (STAT) reader.
//!
//! Only the station header, the climate classification and the monthly ASHRAE
//! clear-sky optical depths are extracted. STAT files are usually Latin-1, so
//! the content is decoded lossily and the degree sign is stripped in either
//! encoding.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Location, MonthlyOpticalDepths};

#[derive(Debug, Clone, PartialEq)]
pub struct StatFile {
    location: Arc<Location>,
    monthly_tau_beam: Vec<Option<f64>>,
    monthly_tau_diffuse: Vec<Option<f64>>,
    standard_pressure: Option<f64>,
    ashrae_climate_zone: Option<String>,
    koppen_climate_zone: Option<String>,
}

impl StatFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let stat = Self::parse(&String::from_utf8_lossy(&bytes))?;
        debug!(
            path = %path.display(),
            city = %stat.location.city,
            has_optical_data = !stat.monthly_tau_beam.is_empty(),
            "Parsed STAT file"
        );
        Ok(stat)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();

        let loc_idx = lines
            .iter()
            .position(|l| l.contains("Location --"))
            .ok_or_else(|| Error::StatParse("missing 'Location --' header".to_string()))?;
        let loc_name = after(lines[loc_idx], "Location --").unwrap_or_default();
        let (city, state, country) = split_station_name(loc_name);

        let coords = lines[loc_idx + 1..]
            .iter()
            .find(|l| l.contains("{GMT"))
            .ok_or_else(|| Error::StatParse("missing coordinate line".to_string()))?;
        let (latitude, longitude, utc_offset) = parse_coordinates(coords)?;

        let elevation = lines
            .iter()
            .find_map(|l| after(l, "Elevation --"))
            .map(parse_elevation)
            .transpose()?
            .unwrap_or(0.0);

        let standard_pressure = lines
            .iter()
            .find_map(|l| after(l, "Standard Pressure at Elevation --"))
            .and_then(|s| s.trim_end_matches("Pa").trim().parse::<f64>().ok());

        let source = lines
            .iter()
            .find_map(|l| after(l, "Data Source --"))
            .unwrap_or("-");
        let station_id = lines
            .iter()
            .find_map(|l| after(l, "WMO Station"))
            .unwrap_or("-");

        let location = Location {
            city,
            state,
            country,
            source: source.to_string(),
            station_id: station_id.to_string(),
            latitude,
            longitude,
            utc_offset,
            elevation,
        };

        Ok(Self {
            location: Arc::new(location),
            monthly_tau_beam: monthly_row(&lines, "taub (beam)"),
            monthly_tau_diffuse: monthly_row(&lines, "taud (diffuse)"),
            standard_pressure,
            ashrae_climate_zone: climate_type(&lines, "(ASHRAE"),
            koppen_climate_zone: climate_type(&lines, "(K"),
        })
    }

    pub fn location(&self) -> Arc<Location> {
        Arc::clone(&self.location)
    }

    pub fn monthly_tau_beam(&self) -> &[Option<f64>] {
        &self.monthly_tau_beam
    }

    pub fn monthly_tau_diffuse(&self) -> &[Option<f64>] {
        &self.monthly_tau_diffuse
    }

    pub fn standard_pressure(&self) -> Option<f64> {
        self.standard_pressure
    }

    pub fn ashrae_climate_zone(&self) -> Option<&str> {
        self.ashrae_climate_zone.as_deref()
    }

    pub fn koppen_climate_zone(&self) -> Option<&str> {
        self.koppen_climate_zone.as_deref()
    }

    /// The complete monthly optical-depth table.
    ///
    /// Fails with [`Error::NoOpticalData`] when the file has no table and with
    /// [`Error::MissingOpticalDepth`] when a month is `N/A`.
    pub fn optical_depths(&self) -> Result<MonthlyOpticalDepths> {
        Ok(MonthlyOpticalDepths {
            taub: complete_row(&self.monthly_tau_beam, "monthly_tau_beam")?,
            taud: complete_row(&self.monthly_tau_diffuse, "monthly_tau_diffuse")?,
        })
    }
}

impl FromStr for StatFile {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        Self::parse(content)
    }
}

fn after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|i| line[i + marker.len()..].trim())
}

/// US files read `CITY NAME ST USA`, others `City Name - Country`.
fn split_station_name(name: &str) -> (String, String, String) {
    if let Some((city, country)) = name.rsplit_once(" - ") {
        return (city.trim().to_string(), "-".to_string(), country.trim().to_string());
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.len() {
        0 => ("-".to_string(), "-".to_string(), "-".to_string()),
        1 => (words[0].to_string(), "-".to_string(), "-".to_string()),
        2 => (words[0].to_string(), "-".to_string(), words[1].to_string()),
        n => (
            words[..n - 2].join(" "),
            words[n - 2].to_string(),
            words[n - 1].to_string(),
        ),
    }
}

/// `{N 41° 58'} {W  87° 54'} {GMT -6.0 Hours}`
fn parse_coordinates(line: &str) -> Result<(f64, f64, f64)> {
    let groups: Vec<&str> = line
        .split('{')
        .skip(1)
        .filter_map(|g| g.split('}').next())
        .collect();
    if groups.len() < 3 {
        return Err(Error::StatParse(format!("invalid coordinate line: '{}'", line.trim())));
    }
    let latitude = parse_degrees(groups[0])?;
    let longitude = parse_degrees(groups[1])?;
    let utc_offset = groups[2]
        .trim()
        .trim_start_matches("GMT")
        .trim_end_matches("Hours")
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::StatParse(format!("invalid time zone: '{}'", groups[2])))?;
    Ok((latitude, longitude, utc_offset))
}

fn parse_degrees(group: &str) -> Result<f64> {
    let group = group.trim();
    let invalid = || Error::StatParse(format!("invalid coordinate: '{group}'"));
    let mut chars = group.chars();
    let sign = match chars.next() {
        Some('N') | Some('E') => 1.0,
        Some('S') | Some('W') => -1.0,
        _ => return Err(invalid()),
    };
    let cleaned: String = chars
        .as_str()
        .replace("deg", " ")
        .chars()
        .map(|c| if c.is_ascii_digit() || c == '.' { c } else { ' ' })
        .collect();
    let mut parts = cleaned.split_whitespace().map(str::parse::<f64>);
    let degrees = parts.next().ok_or_else(invalid)?.map_err(|_| invalid())?;
    let minutes = parts.next().transpose().map_err(|_| invalid())?.unwrap_or(0.0);
    Ok(sign * (degrees + minutes / 60.0))
}

/// `  201m above sea level`
fn parse_elevation(text: &str) -> Result<f64> {
    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || c.is_whitespace())
        .collect();
    let value = digits
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::StatParse(format!("invalid elevation: '{text}'")))?;
    Ok(if text.to_ascii_lowercase().contains("below") {
        -value
    } else {
        value
    })
}

fn monthly_row(lines: &[&str], label: &str) -> Vec<Option<f64>> {
    lines
        .iter()
        .find_map(|l| l.trim_start().strip_prefix(label))
        .map(|rest| {
            rest.split_whitespace()
                .take(12)
                .map(|v| v.parse::<f64>().ok())
                .collect()
        })
        .unwrap_or_default()
}

fn complete_row(row: &[Option<f64>], name: &'static str) -> Result<[f64; 12]> {
    if row.is_empty() {
        return Err(Error::NoOpticalData);
    }
    let mut out = [0.0; 12];
    for (month, slot) in out.iter_mut().enumerate() {
        *slot = row
            .get(month)
            .copied()
            .flatten()
            .ok_or(Error::MissingOpticalDepth {
                name,
                month: month + 1,
            })?;
    }
    Ok(out)
}

/// ` - Climate type "5A" (ASHRAE Standards ...)`
fn climate_type(lines: &[&str], qualifier: &str) -> Option<String> {
    lines.iter().find_map(|l| {
        let rest = after(l, "Climate type")?;
        let (_, quoted) = rest.split_once('"')?;
        let (zone, tail) = quoted.split_once('"')?;
        tail.trim_start()
            .starts_with(qualifier)
            .then(|| zone.to_string())
    })
}
