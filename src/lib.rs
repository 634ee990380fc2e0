pub mod angles;
pub mod epw;
pub mod error;
pub mod parallel;
pub mod series;
pub mod sky_model;
pub mod stat;
pub mod types;
pub mod wea;
pub mod wea_file;

pub use angles::{
    angle_of_incidence, cos_angle_of_incidence, deg_to_rad, equation_of_time,
    extraterrestrial_irradiance, hour_angle, intermediate_angle_b, normalize_angle, rad_to_deg,
    relative_air_mass, solar_altitude, solar_azimuth, solar_declination, solar_position,
    solar_time_correction, solar_zenith_angle, DEGREES_PER_HOUR, SOLAR_CONSTANT,
};

pub use epw::{EpwField, EpwFile, WeatherSource};

pub use error::{Error, Result};

pub use series::{
    day_of_year, days_in_months, doy_to_month_day, hours_per_year, is_valid_date, sample_index,
    series_length, timestamp_at, validate_timestep, AnnualTimeSeries, HOURS_PER_LEAP_YEAR,
    HOURS_PER_YEAR,
};

pub use sky_model::{
    ashrae_revised_clear_sky, clearness_index, disc_direct_normal, erbs_diffuse_fraction,
    split_global, zhang_huang_global,
};

pub use stat::StatFile;

pub use types::{
    ClearSkyConfig, Decomposition, DirectionalIrradiance, Location, MonthlyOpticalDepths,
    SolarPosition, Surface, Timestamp, ZhangHuangConfig, DEFAULT_OPTICAL_DEPTHS,
};

pub use wea::{Wea, WeaRecord, ZhangHuangInputs};

pub use wea_file::{format_value, HoursEntry, HoursFile};
