//! EnergyPlus Weather (EPW) reader.
//!
//! EPW files carry 8 header lines (the first is `LOCATION,...`) followed by one
//! comma-separated row per hour. Only the columns needed to derive irradiance are
//! kept. A column that is absent from any row is reported as missing when
//! requested, never zero-filled.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::series::{HOURS_PER_LEAP_YEAR, HOURS_PER_YEAR};
use crate::types::Location;

const HEADER_LINES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpwField {
    DryBulbTemperature,
    DewPointTemperature,
    RelativeHumidity,
    AtmosphericStationPressure,
    GlobalHorizontalRadiation,
    DirectNormalRadiation,
    DiffuseHorizontalRadiation,
    WindDirection,
    WindSpeed,
    TotalSkyCover,
    OpaqueSkyCover,
}

impl EpwField {
    pub const ALL: [EpwField; 11] = [
        EpwField::DryBulbTemperature,
        EpwField::DewPointTemperature,
        EpwField::RelativeHumidity,
        EpwField::AtmosphericStationPressure,
        EpwField::GlobalHorizontalRadiation,
        EpwField::DirectNormalRadiation,
        EpwField::DiffuseHorizontalRadiation,
        EpwField::WindDirection,
        EpwField::WindSpeed,
        EpwField::TotalSkyCover,
        EpwField::OpaqueSkyCover,
    ];

    /// Zero-based column in an EPW data row.
    pub fn column(self) -> usize {
        match self {
            EpwField::DryBulbTemperature => 6,
            EpwField::DewPointTemperature => 7,
            EpwField::RelativeHumidity => 8,
            EpwField::AtmosphericStationPressure => 9,
            EpwField::GlobalHorizontalRadiation => 13,
            EpwField::DirectNormalRadiation => 14,
            EpwField::DiffuseHorizontalRadiation => 15,
            EpwField::WindDirection => 20,
            EpwField::WindSpeed => 21,
            EpwField::TotalSkyCover => 22,
            EpwField::OpaqueSkyCover => 23,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EpwField::DryBulbTemperature => "dry_bulb_temperature",
            EpwField::DewPointTemperature => "dew_point_temperature",
            EpwField::RelativeHumidity => "relative_humidity",
            EpwField::AtmosphericStationPressure => "atmospheric_station_pressure",
            EpwField::GlobalHorizontalRadiation => "global_horizontal_radiation",
            EpwField::DirectNormalRadiation => "direct_normal_radiation",
            EpwField::DiffuseHorizontalRadiation => "diffuse_horizontal_radiation",
            EpwField::WindDirection => "wind_direction",
            EpwField::WindSpeed => "wind_speed",
            EpwField::TotalSkyCover => "total_sky_cover",
            EpwField::OpaqueSkyCover => "opaque_sky_cover",
        }
    }

    /// EPW sentinel for a missing observation.
    pub fn missing_value(self) -> f64 {
        match self {
            EpwField::DryBulbTemperature | EpwField::DewPointTemperature => 99.9,
            EpwField::RelativeHumidity | EpwField::WindDirection | EpwField::WindSpeed => 999.0,
            EpwField::AtmosphericStationPressure => 999999.0,
            EpwField::GlobalHorizontalRadiation
            | EpwField::DirectNormalRadiation
            | EpwField::DiffuseHorizontalRadiation => 9999.0,
            EpwField::TotalSkyCover | EpwField::OpaqueSkyCover => 99.0,
        }
    }
}

impl fmt::Display for EpwField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hourly meteorological data for one year at one location.
///
/// This is the seam between the irradiance engine and whatever reads weather
/// files. [`EpwFile`] is the bundled implementation.
pub trait WeatherSource {
    fn location(&self) -> Arc<Location>;

    fn is_leap_year(&self) -> bool;

    /// All hourly values of `field`, or [`Error::MissingField`].
    fn hourly_values(&self, field: EpwField) -> Result<&[f64]>;
}

#[derive(Debug, Clone)]
pub struct EpwFile {
    location: Arc<Location>,
    is_leap_year: bool,
    fields: HashMap<EpwField, Vec<f64>>,
}

impl EpwFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let epw = Self::parse(BufReader::new(file))?;
        debug!(path = %path.display(), city = %epw.location.city, "Parsed EPW file");
        Ok(epw)
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header = lines.next().ok_or_else(|| Error::EpwParse {
            line: 1,
            reason: "empty file".to_string(),
        })??;
        let location = parse_location(&header)?;

        for line_no in 2..=HEADER_LINES {
            if lines.next().transpose()?.is_none() {
                return Err(Error::EpwParse {
                    line: line_no,
                    reason: "unexpected end of file before data section".to_string(),
                });
            }
        }

        let mut columns: HashMap<EpwField, Option<Vec<f64>>> = EpwField::ALL
            .iter()
            .map(|&f| (f, Some(Vec::with_capacity(HOURS_PER_LEAP_YEAR))))
            .collect();
        let mut rows = 0usize;

        for (i, line) in lines.enumerate() {
            let line = line?;
            let line_no = i + HEADER_LINES + 1;
            if line.trim().is_empty() || line.trim_start().starts_with('!') {
                continue;
            }
            let parts: Vec<&str> = line.split(',').collect();
            for (&field, values) in columns.iter_mut() {
                if values.is_none() {
                    continue;
                }
                match parts.get(field.column()) {
                    Some(raw) => {
                        let v = raw.trim().parse::<f64>().map_err(|_| Error::EpwParse {
                            line: line_no,
                            reason: format!("invalid {field}: '{}'", raw.trim()),
                        })?;
                        if let Some(list) = values {
                            list.push(v);
                        }
                    }
                    None => *values = None,
                }
            }
            rows += 1;
        }

        let is_leap_year = match rows {
            HOURS_PER_YEAR => false,
            HOURS_PER_LEAP_YEAR => true,
            n => {
                return Err(Error::EpwParse {
                    line: n + HEADER_LINES,
                    reason: format!(
                        "expected {HOURS_PER_YEAR} or {HOURS_PER_LEAP_YEAR} hourly rows, found {n}"
                    ),
                })
            }
        };

        let fields: HashMap<EpwField, Vec<f64>> = columns
            .into_iter()
            .filter_map(|(field, values)| values.map(|v| (field, v)))
            .collect();

        for (field, values) in &fields {
            let sentinel = field.missing_value();
            let missing = values.iter().filter(|&&v| v >= sentinel).count();
            if missing > 0 {
                warn!(field = %field, missing, "EPW column contains missing-value sentinels");
            }
        }

        Ok(Self {
            location: Arc::new(location),
            is_leap_year,
            fields,
        })
    }
}

impl FromStr for EpwFile {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        Self::parse(content.as_bytes())
    }
}

impl WeatherSource for EpwFile {
    fn location(&self) -> Arc<Location> {
        Arc::clone(&self.location)
    }

    fn is_leap_year(&self) -> bool {
        self.is_leap_year
    }

    fn hourly_values(&self, field: EpwField) -> Result<&[f64]> {
        self.fields
            .get(&field)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingField(field.name().to_string()))
    }
}

/// `LOCATION,city,state,country,source,WMO,latitude,longitude,utc_offset,elevation`
fn parse_location(line: &str) -> Result<Location> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 10 || !parts[0].eq_ignore_ascii_case("LOCATION") {
        return Err(Error::EpwParse {
            line: 1,
            reason: "invalid LOCATION header".to_string(),
        });
    }
    let number = |idx: usize, what: &str| -> Result<f64> {
        parts[idx].parse::<f64>().map_err(|_| Error::EpwParse {
            line: 1,
            reason: format!("invalid {what}: '{}'", parts[idx]),
        })
    };
    Ok(Location {
        city: parts[1].to_string(),
        state: parts[2].to_string(),
        country: parts[3].to_string(),
        source: parts[4].to_string(),
        station_id: parts[5].to_string(),
        latitude: number(6, "latitude")?,
        longitude: number(7, "longitude")?,
        utc_offset: number(8, "time zone")?,
        elevation: number(9, "elevation")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location_header() {
        let loc = parse_location(
            "LOCATION,Chicago Ohare Intl Ap,IL,USA,TMY3,725300,41.98,-87.92,-6.0,201.0",
        )
        .unwrap();
        assert_eq!(loc.city, "Chicago Ohare Intl Ap");
        assert_eq!(loc.state, "IL");
        assert_eq!(loc.station_id, "725300");
        assert_eq!(loc.longitude, -87.92);
        assert_eq!(loc.utc_offset, -6.0);
    }

    #[test]
    fn test_parse_location_rejects_other_headers() {
        assert!(parse_location("DESIGN CONDITIONS,0").is_err());
    }
}
