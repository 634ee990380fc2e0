//! The irradiance aggregate.
//!
//! A [`Wea`] holds a location plus one year of direct normal and diffuse
//! horizontal irradiance. Every other quantity (direct/global horizontal,
//! irradiance on a tilted surface) is derived from those two series on each
//! call; the base series are never modified.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::angles::{cos_angle_of_incidence, deg_to_rad, solar_position};
use crate::epw::{EpwField, EpwFile, WeatherSource};
use crate::error::{Error, Result};
use crate::series::{evaluate, validate_timestep, AnnualTimeSeries, HOURS_PER_LEAP_YEAR, HOURS_PER_YEAR};
use crate::sky_model::{ashrae_revised_clear_sky, split_global, zhang_huang_global};
use crate::stat::StatFile;
use crate::types::{
    ClearSkyConfig, DirectionalIrradiance, Location, MonthlyOpticalDepths, SolarPosition,
    Surface, ZhangHuangConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WeaRecord", try_from = "WeaRecord")]
pub struct Wea {
    location: Arc<Location>,
    direct_normal_irradiance: AnnualTimeSeries,
    diffuse_horizontal_irradiance: AnnualTimeSeries,
}

/// Plain structured form of a [`Wea`]. Timestamps are not stored; they are
/// re-derived from `timestep` and `is_leap_year` on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaRecord {
    pub location: Location,
    pub timestep: u32,
    pub is_leap_year: bool,
    pub direct_normal_irradiance: Vec<f64>,
    pub diffuse_horizontal_irradiance: Vec<f64>,
}

/// Hourly observations for one year feeding the Zhang-Huang model.
#[derive(Debug, Clone, Copy)]
pub struct ZhangHuangInputs<'a> {
    /// Tenths of sky covered (0-10).
    pub total_sky_cover: &'a [f64],
    /// Percent.
    pub relative_humidity: &'a [f64],
    /// °C.
    pub dry_bulb_temperature: &'a [f64],
    /// m/s.
    pub wind_speed: &'a [f64],
    /// Pa.
    pub station_pressure: &'a [f64],
}

impl ZhangHuangInputs<'_> {
    fn hours(&self) -> Result<usize> {
        let n = self.total_sky_cover.len();
        let lengths = [
            ("relative_humidity", self.relative_humidity.len()),
            ("dry_bulb_temperature", self.dry_bulb_temperature.len()),
            ("wind_speed", self.wind_speed.len()),
            ("station_pressure", self.station_pressure.len()),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != n) {
            return Err(Error::SeriesMismatch(format!(
                "total_sky_cover has {n} values but {name} has {len}"
            )));
        }
        Ok(n)
    }
}

impl Wea {
    pub fn new(
        location: Arc<Location>,
        direct_normal_irradiance: AnnualTimeSeries,
        diffuse_horizontal_irradiance: AnnualTimeSeries,
    ) -> Result<Self> {
        direct_normal_irradiance.ensure_aligned(&diffuse_horizontal_irradiance)?;
        Ok(Self {
            location,
            direct_normal_irradiance,
            diffuse_horizontal_irradiance,
        })
    }

    pub fn from_values(
        location: Arc<Location>,
        direct_normal_irradiance: Vec<f64>,
        diffuse_horizontal_irradiance: Vec<f64>,
        timestep: u32,
        is_leap_year: bool,
    ) -> Result<Self> {
        Self::new(
            location,
            AnnualTimeSeries::new(direct_normal_irradiance, timestep, is_leap_year)?,
            AnnualTimeSeries::new(diffuse_horizontal_irradiance, timestep, is_leap_year)?,
        )
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    pub fn timestep(&self) -> u32 {
        self.direct_normal_irradiance.timestep()
    }

    pub fn is_leap_year(&self) -> bool {
        self.direct_normal_irradiance.is_leap_year()
    }

    pub fn len(&self) -> usize {
        self.direct_normal_irradiance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct_normal_irradiance.is_empty()
    }

    pub fn direct_normal_irradiance(&self) -> &AnnualTimeSeries {
        &self.direct_normal_irradiance
    }

    pub fn diffuse_horizontal_irradiance(&self) -> &AnnualTimeSeries {
        &self.diffuse_horizontal_irradiance
    }

    // ── Factories ──

    /// ASHRAE revised clear-sky year.
    pub fn from_ashrae_clear_sky(
        location: Arc<Location>,
        optical_depths: &MonthlyOpticalDepths,
        config: &ClearSkyConfig,
    ) -> Result<Self> {
        validate_timestep(config.timestep)?;
        for (name, row) in [("taub", &optical_depths.taub), ("taud", &optical_depths.taud)] {
            if let Some(bad) = row.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                return Err(Error::InvalidParameter {
                    name,
                    value: bad.to_string(),
                    reason: "optical depth must be positive".to_string(),
                });
            }
        }

        let is_leap_year = config.is_leap_year;
        let loc = location.as_ref();
        let (dni, dhi): (Vec<f64>, Vec<f64>) =
            evaluate(config.timestep, is_leap_year, |_, ts| {
                let pos = solar_position(loc, ts.month, ts.day, ts.float_hour(), is_leap_year);
                let (taub, taud) = optical_depths.for_month(ts.month);
                ashrae_revised_clear_sky(&pos, taub, taud, config.use_2017_model)
            })
            .into_iter()
            .unzip();

        info!(
            city = %location.city,
            timestep = config.timestep,
            is_leap_year,
            samples = dni.len(),
            "Computed ASHRAE clear-sky irradiance"
        );
        Self::from_values(location, dni, dhi, config.timestep, is_leap_year)
    }

    /// Clear-sky year from the optical depths of a STAT file, at timestep 1.
    pub fn from_stat_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_stat(&StatFile::from_file(path)?, &ClearSkyConfig::default())
    }

    pub fn from_stat(stat: &StatFile, config: &ClearSkyConfig) -> Result<Self> {
        let optical_depths = stat.optical_depths()?;
        Self::from_ashrae_clear_sky(stat.location(), &optical_depths, config)
    }

    /// Recorded irradiance of an EPW file, at timestep 1.
    pub fn from_epw_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_weather_source(&EpwFile::from_file(path)?)
    }

    pub fn from_weather_source<S: WeatherSource + ?Sized>(source: &S) -> Result<Self> {
        let dni = source.hourly_values(EpwField::DirectNormalRadiation)?.to_vec();
        let dhi = source.hourly_values(EpwField::DiffuseHorizontalRadiation)?.to_vec();
        Self::from_values(source.location(), dni, dhi, 1, source.is_leap_year())
    }

    /// Zhang-Huang estimate from hourly cloud, humidity, temperature, wind and pressure.
    pub fn from_zhang_huang_solar(
        location: Arc<Location>,
        inputs: &ZhangHuangInputs<'_>,
        config: &ZhangHuangConfig,
    ) -> Result<Self> {
        let n = inputs.hours()?;
        let is_leap_year = match n {
            HOURS_PER_YEAR => false,
            HOURS_PER_LEAP_YEAR => true,
            _ => {
                return Err(Error::LengthMismatch {
                    expected: HOURS_PER_YEAR,
                    actual: n,
                    timestep: 1,
                    is_leap_year: false,
                })
            }
        };

        let out_of_range = inputs
            .total_sky_cover
            .iter()
            .filter(|c| !(0.0..=10.0).contains(*c))
            .count();
        if out_of_range > 0 {
            warn!(out_of_range, "Total sky cover outside 0-10 tenths");
        }

        let loc = location.as_ref();
        let (dni, dhi): (Vec<f64>, Vec<f64>) = evaluate(1, is_leap_year, |i, ts| {
            let pos = solar_position(loc, ts.month, ts.day, ts.float_hour(), is_leap_year);
            let ghi = zhang_huang_global(
                pos.altitude,
                inputs.total_sky_cover[i],
                inputs.relative_humidity[i],
                inputs.dry_bulb_temperature[i],
                inputs.dry_bulb_temperature[(i + n - 3) % n],
                inputs.wind_speed[i],
            );
            split_global(ghi, &pos, inputs.station_pressure[i], config.decomposition)
        })
        .into_iter()
        .unzip();

        info!(
            city = %location.city,
            decomposition = ?config.decomposition,
            samples = n,
            "Computed Zhang-Huang irradiance"
        );
        Self::from_values(location, dni, dhi, 1, is_leap_year)
    }

    pub fn from_zhang_huang_weather_source<S: WeatherSource + ?Sized>(
        source: &S,
        config: &ZhangHuangConfig,
    ) -> Result<Self> {
        let inputs = ZhangHuangInputs {
            total_sky_cover: source.hourly_values(EpwField::TotalSkyCover)?,
            relative_humidity: source.hourly_values(EpwField::RelativeHumidity)?,
            dry_bulb_temperature: source.hourly_values(EpwField::DryBulbTemperature)?,
            wind_speed: source.hourly_values(EpwField::WindSpeed)?,
            station_pressure: source.hourly_values(EpwField::AtmosphericStationPressure)?,
        };
        Self::from_zhang_huang_solar(source.location(), &inputs, config)
    }

    // ── Derived series ──

    pub fn solar_positions(&self) -> Vec<SolarPosition> {
        let loc = self.location.as_ref();
        let is_leap_year = self.is_leap_year();
        evaluate(self.timestep(), is_leap_year, |_, ts| {
            solar_position(loc, ts.month, ts.day, ts.float_hour(), is_leap_year)
        })
    }

    /// Hours of the year at which the sun is above the horizon.
    pub fn sun_up_hours(&self) -> Vec<f64> {
        let step = 1.0 / self.timestep() as f64;
        self.solar_positions()
            .iter()
            .enumerate()
            .filter(|(_, pos)| pos.is_sun_up())
            .map(|(i, _)| i as f64 * step)
            .collect()
    }

    pub fn direct_horizontal_irradiance(&self) -> Result<AnnualTimeSeries> {
        self.direct_horizontal_from(&self.solar_positions())
    }

    pub fn global_horizontal_irradiance(&self) -> Result<AnnualTimeSeries> {
        self.diffuse_horizontal_irradiance
            .add(&self.direct_horizontal_irradiance()?)
    }

    /// `(total, direct, diffuse, ground_reflected)` on a surface with no ground reflectance.
    pub fn directional_irradiance(
        &self,
        surface_azimuth: f64,
        surface_tilt: f64,
    ) -> Result<DirectionalIrradiance> {
        self.directional_irradiance_with(&Surface {
            azimuth: surface_azimuth,
            tilt: surface_tilt,
            ..Surface::default()
        })
    }

    /// Isotropic-sky projection onto `surface`.
    pub fn directional_irradiance_with(&self, surface: &Surface) -> Result<DirectionalIrradiance> {
        let positions = self.solar_positions();
        let direct_horizontal = self.direct_horizontal_from(&positions)?;
        let global = self.diffuse_horizontal_irradiance.add(&direct_horizontal)?;

        let direct_values = self
            .direct_normal_irradiance
            .iter()
            .zip(&positions)
            .map(|(&dni, pos)| {
                if pos.is_sun_up() {
                    dni * cos_angle_of_incidence(pos, surface.azimuth, surface.tilt).max(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        let direct = AnnualTimeSeries::new(direct_values, self.timestep(), self.is_leap_year())?;

        let cos_tilt = deg_to_rad(surface.tilt).cos();
        let diffuse = self
            .diffuse_horizontal_irradiance
            .scale((1.0 + cos_tilt) / 2.0);
        let ground_reflected = global.scale(surface.ground_reflectance * (1.0 - cos_tilt) / 2.0);
        let total = direct.add(&diffuse)?.add(&ground_reflected)?;

        Ok(DirectionalIrradiance {
            total,
            direct,
            diffuse,
            ground_reflected,
        })
    }

    fn direct_horizontal_from(&self, positions: &[SolarPosition]) -> Result<AnnualTimeSeries> {
        if positions.len() != self.len() {
            return Err(Error::SeriesMismatch(format!(
                "{} solar positions for {} samples",
                positions.len(),
                self.len()
            )));
        }
        let values = self
            .direct_normal_irradiance
            .iter()
            .zip(positions)
            .map(|(&dni, pos)| {
                if pos.is_sun_up() {
                    dni * deg_to_rad(pos.altitude).sin().max(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        AnnualTimeSeries::new(values, self.timestep(), self.is_leap_year())
    }

    // ── Serialization ──

    pub fn to_structured(&self) -> WeaRecord {
        WeaRecord {
            location: self.location.as_ref().clone(),
            timestep: self.timestep(),
            is_leap_year: self.is_leap_year(),
            direct_normal_irradiance: self.direct_normal_irradiance.values().to_vec(),
            diffuse_horizontal_irradiance: self.diffuse_horizontal_irradiance.values().to_vec(),
        }
    }

    pub fn from_structured(record: WeaRecord) -> Result<Self> {
        Self::from_values(
            Arc::new(record.location),
            record.direct_normal_irradiance,
            record.diffuse_horizontal_irradiance,
            record.timestep,
            record.is_leap_year,
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<Wea> for WeaRecord {
    fn from(wea: Wea) -> Self {
        wea.to_structured()
    }
}

impl TryFrom<WeaRecord> for Wea {
    type Error = Error;

    fn try_from(record: WeaRecord) -> Result<Self> {
        Self::from_structured(record)
    }
}
