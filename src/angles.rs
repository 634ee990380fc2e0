use crate::series::day_of_year;
use crate::types::{Location, SolarPosition};

pub const DEGREES_PER_HOUR: f64 = 15.0;
pub const SOLAR_CONSTANT: f64 = 1367.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

pub fn intermediate_angle_b(n: u32) -> f64 {
    deg_to_rad((n as f64 - 1.0) * (360.0 / 365.0))
}

/// Equation of time in minutes.
pub fn equation_of_time(n: u32) -> f64 {
    let b = intermediate_angle_b(n);
    229.18
        * (0.000075
            + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Spencer (1971) declination in degrees.
pub fn solar_declination(n: u32) -> f64 {
    let g = intermediate_angle_b(n);
    rad_to_deg(
        0.006918 - 0.399912 * g.cos() + 0.070257 * g.sin()
            - 0.006758 * (2.0 * g).cos()
            + 0.000907 * (2.0 * g).sin()
            - 0.002697 * (3.0 * g).cos()
            + 0.00148 * (3.0 * g).sin(),
    )
}

/// Extraterrestrial normal irradiance (W/m²) with the orbit eccentricity correction.
pub fn extraterrestrial_irradiance(n: u32) -> f64 {
    let b = intermediate_angle_b(n);
    SOLAR_CONSTANT
        * (1.000110
            + 0.034221 * b.cos()
            + 0.001280 * b.sin()
            + 0.000719 * (2.0 * b).cos()
            + 0.000077 * (2.0 * b).sin())
}

/// Hours to add to local standard time to get local solar time.
pub fn solar_time_correction(longitude: f64, standard_meridian: f64, eot: f64) -> f64 {
    (4.0 * (longitude - standard_meridian) + eot) / 60.0
}

pub fn hour_angle(local_solar_time: f64) -> f64 {
    DEGREES_PER_HOUR * (local_solar_time - 12.0)
}

pub fn solar_zenith_angle(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let cos_zenith =
        lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    rad_to_deg(cos_zenith.clamp(-1.0, 1.0).acos())
}

pub fn solar_altitude(zenith_angle: f64) -> f64 {
    90.0 - zenith_angle
}

/// Azimuth clockwise from north.
pub fn solar_azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let sin_az = -dec_rad.cos() * ha_rad.sin();
    let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    normalize_angle(rad_to_deg(sin_az.atan2(cos_az)))
}

/// Kasten and Young (1989) relative air mass. `None` at or below the horizon.
pub fn relative_air_mass(altitude: f64) -> Option<f64> {
    if altitude <= 0.0 {
        return None;
    }
    Some(1.0 / (deg_to_rad(altitude).sin() + 0.50572 * (6.07995 + altitude).powf(-1.6364)))
}

/// Sun position at local standard time `hour` (decimal) on `month/day`.
pub fn solar_position(
    location: &Location,
    month: u32,
    day: u32,
    hour: f64,
    is_leap_year: bool,
) -> SolarPosition {
    let n = day_of_year(month, day, is_leap_year);
    let eot = equation_of_time(n);
    let decl = solar_declination(n);
    let correction =
        solar_time_correction(location.longitude, location.standard_meridian(), eot);
    let lst = hour + correction;
    let ha = hour_angle(lst);
    let zenith = solar_zenith_angle(location.latitude, decl, ha);
    let altitude = solar_altitude(zenith);
    SolarPosition {
        day_of_year: n,
        declination: decl,
        equation_of_time: eot,
        local_solar_time: lst,
        hour_angle: ha,
        zenith,
        altitude,
        azimuth: solar_azimuth(location.latitude, decl, ha),
        air_mass: relative_air_mass(altitude),
        extraterrestrial_irradiance: extraterrestrial_irradiance(n),
    }
}

/// Cosine of the angle between the sun vector and a surface normal.
///
/// For `tilt == 0` this is exactly `sin(altitude)`.
pub fn cos_angle_of_incidence(pos: &SolarPosition, surface_azimuth: f64, surface_tilt: f64) -> f64 {
    let alt = deg_to_rad(pos.altitude);
    let tilt = deg_to_rad(surface_tilt);
    let rel_az = deg_to_rad(pos.azimuth - surface_azimuth);
    alt.cos() * tilt.sin() * rel_az.cos() + alt.sin() * tilt.cos()
}

pub fn angle_of_incidence(pos: &SolarPosition, surface_azimuth: f64, surface_tilt: f64) -> f64 {
    rad_to_deg(
        cos_angle_of_incidence(pos, surface_azimuth, surface_tilt)
            .clamp(-1.0, 1.0)
            .acos(),
    )
}
