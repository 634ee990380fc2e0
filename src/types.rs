use serde::{Deserialize, Serialize};

use crate::series::AnnualTimeSeries;

/// Geographic location of a weather station.
///
/// Longitude is east positive, `utc_offset` is the standard time zone in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
    pub source: String,
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset: f64,
    pub elevation: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            city: "-".to_string(),
            state: "-".to_string(),
            country: "-".to_string(),
            source: "-".to_string(),
            station_id: "-".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            utc_offset: 0.0,
            elevation: 0.0,
        }
    }
}

impl Location {
    pub fn new(
        city: &str,
        source: &str,
        country: &str,
        latitude: f64,
        longitude: f64,
        utc_offset: f64,
        elevation: f64,
    ) -> Self {
        Self {
            city: city.to_string(),
            source: source.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
            utc_offset,
            elevation,
            ..Self::default()
        }
    }

    /// Longitude of the time zone's standard meridian, east positive.
    pub fn standard_meridian(&self) -> f64 {
        15.0 * self.utc_offset
    }
}

/// Calendar position of one sample. Always derived from a sample index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Timestamp {
    pub fn float_hour(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0
    }

    pub fn day_of_year(&self, is_leap_year: bool) -> u32 {
        crate::series::day_of_year(self.month, self.day, is_leap_year)
    }

    pub fn hour_of_year(&self, is_leap_year: bool) -> f64 {
        (self.day_of_year(is_leap_year) - 1) as f64 * 24.0 + self.float_hour()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub day_of_year: u32,
    pub declination: f64,
    pub equation_of_time: f64,
    pub local_solar_time: f64,
    pub hour_angle: f64,
    pub zenith: f64,
    pub altitude: f64,
    pub azimuth: f64,
    /// Relative (Kasten-Young) air mass; `None` while the sun is down.
    pub air_mass: Option<f64>,
    pub extraterrestrial_irradiance: f64,
}

impl SolarPosition {
    pub fn is_sun_up(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Monthly ASHRAE clear-sky beam (`taub`) and diffuse (`taud`) optical depths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOpticalDepths {
    pub taub: [f64; 12],
    pub taud: [f64; 12],
}

/// Single standard atmosphere applied to every month.
pub const DEFAULT_OPTICAL_DEPTHS: MonthlyOpticalDepths = MonthlyOpticalDepths {
    taub: [0.2953; 12],
    taud: [2.7927; 12],
};

impl Default for MonthlyOpticalDepths {
    fn default() -> Self {
        DEFAULT_OPTICAL_DEPTHS
    }
}

impl MonthlyOpticalDepths {
    /// `(taub, taud)` for a calendar month (1-12).
    pub fn for_month(&self, month: u32) -> (f64, f64) {
        let idx = (month.clamp(1, 12) - 1) as usize;
        (self.taub[idx], self.taud[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearSkyConfig {
    pub timestep: u32,
    pub is_leap_year: bool,
    /// Use the ASHRAE 2017 air-mass exponent regressions instead of 2009.
    pub use_2017_model: bool,
}

impl Default for ClearSkyConfig {
    fn default() -> Self {
        Self {
            timestep: 1,
            is_leap_year: false,
            use_2017_model: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decomposition {
    #[default]
    Disc,
    Erbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZhangHuangConfig {
    pub decomposition: Decomposition,
}

/// Orientation of a receiving surface.
///
/// Azimuth is clockwise from north (180 = south), tilt is from horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub azimuth: f64,
    pub tilt: f64,
    pub ground_reflectance: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            azimuth: 180.0,
            tilt: 0.0,
            ground_reflectance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalIrradiance {
    pub total: AnnualTimeSeries,
    pub direct: AnnualTimeSeries,
    pub diffuse: AnnualTimeSeries,
    pub ground_reflected: AnnualTimeSeries,
}
