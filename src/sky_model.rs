//! Sky radiation models.
//!
//! - ASHRAE revised clear sky (Handbook of Fundamentals 2009, optional 2017 exponents)
//! - Zhang-Huang (2002) global horizontal regression from synoptic observations
//! - DISC (Maxwell 1987) and Erbs (1982) global-to-direct/diffuse decomposition
//!
//! Every function returns exactly zero while the sun is at or below the horizon.

use crate::angles::deg_to_rad;
use crate::types::{Decomposition, SolarPosition};

/// Floor on `sin(altitude)` when normalizing by extraterrestrial horizontal irradiance.
pub const MIN_SIN_ALTITUDE: f64 = 0.065;
/// Below this altitude (degrees) DISC reports no beam.
pub const DISC_MIN_ALTITUDE: f64 = 3.0;
pub const DISC_MAX_AIR_MASS: f64 = 12.0;
pub const STANDARD_PRESSURE: f64 = 101325.0;

/// Zhang-Huang regression coefficients `(c0, c1, c2, c3, c4, c5, d, k)`.
pub const ZHANG_HUANG_COEFFICIENTS: [f64; 8] =
    [0.5598, 0.4982, -0.6762, 0.02842, -0.00317, 0.014, -17.853, 0.843];
/// Solar constant used by the Zhang-Huang fit (W/m²).
pub const ZHANG_HUANG_SOLAR_CONSTANT: f64 = 1355.0;

/// Air-mass exponents `(ab, ad)` for the revised clear-sky model.
pub fn air_mass_exponents(taub: f64, taud: f64, use_2017_model: bool) -> (f64, f64) {
    if use_2017_model {
        (
            1.454 - 0.406 * taub - 0.268 * taud + 0.021 * taub * taud,
            0.507 + 0.205 * taub - 0.080 * taud - 0.190 * taub * taud,
        )
    } else {
        (
            1.219 - 0.043 * taub - 0.151 * taud - 0.204 * taub * taud,
            0.202 + 0.852 * taub - 0.007 * taud - 0.357 * taub * taud,
        )
    }
}

/// Clear-sky `(direct_normal, diffuse_horizontal)` irradiance in W/m².
pub fn ashrae_revised_clear_sky(
    pos: &SolarPosition,
    taub: f64,
    taud: f64,
    use_2017_model: bool,
) -> (f64, f64) {
    let air_mass = match pos.air_mass {
        Some(m) if pos.is_sun_up() => m,
        _ => return (0.0, 0.0),
    };
    let (ab, ad) = air_mass_exponents(taub, taud, use_2017_model);
    let e0 = pos.extraterrestrial_irradiance;
    (
        e0 * (-taub * air_mass.powf(ab)).exp(),
        e0 * (-taud * air_mass.powf(ad)).exp(),
    )
}

/// Zhang-Huang global horizontal irradiance in W/m².
///
/// `total_sky_cover` is in tenths (0-10), `relative_humidity` in percent,
/// temperatures in °C and `wind_speed` in m/s.
pub fn zhang_huang_global(
    altitude: f64,
    total_sky_cover: f64,
    relative_humidity: f64,
    dry_bulb: f64,
    dry_bulb_3h_prior: f64,
    wind_speed: f64,
) -> f64 {
    if altitude <= 0.0 {
        return 0.0;
    }
    let [c0, c1, c2, c3, c4, c5, d, k] = ZHANG_HUANG_COEFFICIENTS;
    let cc = total_sky_cover / 10.0;
    let regression = c0
        + c1 * cc
        + c2 * cc * cc
        + c3 * (dry_bulb - dry_bulb_3h_prior)
        + c4 * relative_humidity
        + c5 * wind_speed;
    let ghi = (ZHANG_HUANG_SOLAR_CONSTANT * deg_to_rad(altitude).sin() * regression + d) / k;
    ghi.max(0.0)
}

pub fn clearness_index(ghi: f64, altitude: f64, extraterrestrial: f64) -> f64 {
    let sin_alt = deg_to_rad(altitude).sin().max(MIN_SIN_ALTITUDE);
    (ghi / (extraterrestrial * sin_alt)).clamp(0.0, 1.0)
}

pub fn absolute_air_mass(relative_air_mass: f64, pressure: f64) -> f64 {
    relative_air_mass * pressure / STANDARD_PRESSURE
}

/// DISC direct normal irradiance estimated from global horizontal.
pub fn disc_direct_normal(ghi: f64, pos: &SolarPosition, pressure: f64) -> f64 {
    let relative = match pos.air_mass {
        Some(m) if pos.altitude >= DISC_MIN_ALTITUDE && ghi > 0.0 => m,
        _ => return 0.0,
    };
    let extra = pos.extraterrestrial_irradiance;
    let kt = clearness_index(ghi, pos.altitude, extra);
    let am = absolute_air_mass(relative.min(DISC_MAX_AIR_MASS), pressure);

    let kt2 = kt * kt;
    let kt3 = kt2 * kt;
    let (a, b, c) = if kt <= 0.6 {
        (
            0.512 - 1.56 * kt + 2.286 * kt2 - 2.222 * kt3,
            0.37 + 0.962 * kt,
            -0.28 + 0.932 * kt - 2.048 * kt2,
        )
    } else {
        (
            -5.743 + 21.77 * kt - 27.49 * kt2 + 11.56 * kt3,
            41.4 - 118.5 * kt + 66.05 * kt2 + 31.9 * kt3,
            -47.01 + 184.2 * kt - 222.0 * kt2 + 73.81 * kt3,
        )
    };
    let delta_kn = a + b * (c * am).exp();
    let knc = 0.866 - 0.122 * am + 0.0121 * am.powi(2) - 0.000653 * am.powi(3)
        + 0.000014 * am.powi(4);

    (extra * (knc - delta_kn)).max(0.0)
}

/// Erbs diffuse fraction of global horizontal for clearness index `kt`.
pub fn erbs_diffuse_fraction(kt: f64) -> f64 {
    if kt <= 0.22 {
        1.0 - 0.09 * kt
    } else if kt > 0.8 {
        0.165
    } else {
        0.9511 - 0.1604 * kt + 4.388 * kt.powi(2) - 16.638 * kt.powi(3) + 12.336 * kt.powi(4)
    }
}

/// Splits global horizontal into `(direct_normal, diffuse_horizontal)`.
///
/// Beam is capped so its horizontal share never exceeds `ghi`; the diffuse part
/// is the remainder and is never negative.
pub fn split_global(
    ghi: f64,
    pos: &SolarPosition,
    pressure: f64,
    decomposition: Decomposition,
) -> (f64, f64) {
    if !pos.is_sun_up() || ghi <= 0.0 {
        return (0.0, 0.0);
    }
    let sin_alt = deg_to_rad(pos.altitude).sin();
    let mut dni = match decomposition {
        Decomposition::Disc => disc_direct_normal(ghi, pos, pressure),
        Decomposition::Erbs => {
            let kt = clearness_index(ghi, pos.altitude, pos.extraterrestrial_irradiance);
            ghi * (1.0 - erbs_diffuse_fraction(kt)) / sin_alt.max(MIN_SIN_ALTITUDE)
        }
    };
    if dni * sin_alt > ghi {
        dni = ghi / sin_alt;
    }
    (dni, (ghi - dni * sin_alt).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun_at(altitude: f64) -> SolarPosition {
        SolarPosition {
            day_of_year: 172,
            declination: 23.4,
            equation_of_time: -1.5,
            local_solar_time: 12.0,
            hour_angle: 0.0,
            zenith: 90.0 - altitude,
            altitude,
            azimuth: 180.0,
            air_mass: crate::angles::relative_air_mass(altitude),
            extraterrestrial_irradiance: 1322.0,
        }
    }

    #[test]
    fn test_erbs_branches_are_continuous_enough() {
        assert!((erbs_diffuse_fraction(0.22) - erbs_diffuse_fraction(0.2201)).abs() < 0.01);
        assert!((erbs_diffuse_fraction(0.8) - erbs_diffuse_fraction(0.8001)).abs() < 0.01);
    }

    #[test]
    fn test_disc_zero_below_min_altitude() {
        assert_eq!(disc_direct_normal(50.0, &sun_at(2.0), STANDARD_PRESSURE), 0.0);
    }

    #[test]
    fn test_split_conserves_global() {
        let pos = sun_at(55.0);
        let sin_alt = deg_to_rad(55.0).sin();
        for ghi in [5.0, 120.0, 480.0, 900.0] {
            for method in [Decomposition::Disc, Decomposition::Erbs] {
                let (dni, dhi) = split_global(ghi, &pos, STANDARD_PRESSURE, method);
                assert!(dni >= 0.0 && dhi >= 0.0);
                assert!((dni * sin_alt + dhi - ghi).abs() < 1e-9, "{method:?} ghi={ghi}");
            }
        }
    }

    #[test]
    fn test_clear_sky_night_is_zero() {
        assert_eq!(ashrae_revised_clear_sky(&sun_at(-5.0), 0.3, 2.4, false), (0.0, 0.0));
        assert_eq!(ashrae_revised_clear_sky(&sun_at(0.0), 0.3, 2.4, true), (0.0, 0.0));
    }
}
