use solar_irradiance::angles::*;
use solar_irradiance::types::{Location, SolarPosition};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn springfield() -> Location {
    Location::new("Springfield", "-", "USA", 39.8, -89.6, -6.0, 180.0)
}

fn at(lat: f64, lon: f64, utc_offset: f64) -> Location {
    Location::new("-", "-", "-", lat, lon, utc_offset, 0.0)
}

// ── NormalizeAngle ──

#[test]
fn test_normalize_angle_basic() {
    let cases: &[(f64, f64)] = &[
        (0.0, 0.0),
        (45.0, 45.0),
        (360.0, 0.0),
        (361.0, 1.0),
        (-1.0, 359.0),
        (-90.0, 270.0),
        (405.0, 45.0),
        (-180.0, 180.0),
        (-450.0, 270.0),
    ];
    for &(input, expected) in cases {
        assert_approx!(normalize_angle(input), expected, 1e-9);
    }
}

// ── SolarDeclination ──

#[test]
fn test_solar_declination_solstices_equinoxes() {
    assert_approx!(solar_declination(172), 23.45, 0.5);
    assert_approx!(solar_declination(355), -23.45, 0.5);
    assert_approx!(solar_declination(80), 0.0, 1.0);
    assert_approx!(solar_declination(264), 0.0, 1.0);
}

#[test]
fn test_solar_declination_bounded_all_days() {
    for n in 1..=366 {
        let decl = solar_declination(n);
        assert!(decl.abs() <= 23.5, "Day {}: {}", n, decl);
    }
}

// ── EquationOfTime ──

#[test]
fn test_equation_of_time_extremes() {
    // Mid-February minimum, early-November maximum.
    assert_approx!(equation_of_time(42), -14.2, 1.0);
    assert_approx!(equation_of_time(307), 16.4, 1.0);
}

// ── ExtraterrestrialIrradiance ──

#[test]
fn test_extraterrestrial_perihelion_aphelion() {
    assert_approx!(extraterrestrial_irradiance(1), 1414.9, 0.5);
    assert_approx!(extraterrestrial_irradiance(183), 1321.4, 0.5);
    assert!(extraterrestrial_irradiance(4) > SOLAR_CONSTANT);
    assert!(extraterrestrial_irradiance(183) < SOLAR_CONSTANT);
}

// ── SolarPosition: Springfield equinox ──

fn springfield_equinox() -> SolarPosition {
    solar_position(&springfield(), 3, 21, 12.0, false)
}

#[test]
fn test_springfield_equinox_day_of_year() {
    assert_eq!(springfield_equinox().day_of_year, 80);
}

#[test]
fn test_springfield_equinox_declination() {
    assert_approx!(springfield_equinox().declination, 0.0, 1.0);
}

#[test]
fn test_springfield_equinox_eot() {
    assert_approx!(springfield_equinox().equation_of_time, -7.5, 2.0);
}

#[test]
fn test_springfield_equinox_altitude() {
    let pos = springfield_equinox();
    assert_approx!(pos.altitude, 50.1, 0.5);
    assert_approx!(pos.zenith, 39.9, 0.5);
}

#[test]
fn test_springfield_equinox_azimuth() {
    let pos = springfield_equinox();
    assert!(
        pos.azimuth >= 174.0 && pos.azimuth <= 185.0,
        "azimuth={}",
        pos.azimuth
    );
}

#[test]
fn test_morning_east_afternoon_west() {
    let morning = solar_position(&springfield(), 3, 21, 9.0, false);
    let afternoon = solar_position(&springfield(), 3, 21, 15.0, false);
    assert!(morning.azimuth > 90.0 && morning.azimuth < 180.0);
    assert!(afternoon.azimuth > 180.0 && afternoon.azimuth < 270.0);
    assert!(morning.hour_angle < 0.0 && afternoon.hour_angle > 0.0);
}

// ── Summer / Winter solstice ──

#[test]
fn test_summer_solstice() {
    let pos = solar_position(&springfield(), 6, 21, 12.0, false);
    assert_approx!(pos.declination, 23.45, 1.0);
    assert_approx!(pos.altitude, 73.65, 0.5);
}

#[test]
fn test_winter_solstice() {
    let pos = solar_position(&springfield(), 12, 21, 12.0, false);
    assert_approx!(pos.declination, -23.45, 1.0);
    assert_approx!(pos.altitude, 26.77, 0.5);
}

#[test]
fn test_leap_year_shifts_day_of_year() {
    let common = solar_position(&springfield(), 3, 1, 12.0, false);
    let leap = solar_position(&springfield(), 3, 1, 12.0, true);
    assert_eq!(common.day_of_year, 60);
    assert_eq!(leap.day_of_year, 61);
}

// ── HourAngle ──

#[test]
fn test_hour_angle_known_values() {
    assert_approx!(hour_angle(12.0), 0.0, 1e-12);
    assert_approx!(hour_angle(13.0), 15.0, 1e-12);
    assert_approx!(hour_angle(11.0), -15.0, 1e-12);
    assert_approx!(hour_angle(15.0), 45.0, 1e-12);
}

#[test]
fn test_solar_time_correction_on_meridian() {
    // On the standard meridian only the equation of time remains.
    assert_approx!(solar_time_correction(-90.0, -90.0, 6.0), 0.1, 1e-12);
    assert_approx!(solar_time_correction(-89.0, -90.0, 0.0), 4.0 / 60.0, 1e-12);
}

// ── DegRad roundtrip ──

#[test]
fn test_deg_rad_roundtrip() {
    for &deg in &[0.0, 45.0, 90.0, 180.0, 270.0, 360.0, -45.0, -180.0, 123.456] {
        assert_approx!(rad_to_deg(deg_to_rad(deg)), deg, 1e-10);
    }
}

#[test]
fn test_known_conversions() {
    assert_approx!(deg_to_rad(180.0), std::f64::consts::PI, 1e-10);
    assert_approx!(deg_to_rad(90.0), std::f64::consts::FRAC_PI_2, 1e-10);
    assert_approx!(rad_to_deg(std::f64::consts::PI), 180.0, 1e-10);
}

// ── Latitude extremes ──

#[test]
fn test_equator_sun_overhead() {
    let pos = solar_position(&at(0.0, 0.0, 0.0), 3, 21, 12.0, false);
    assert!(pos.zenith < 5.0, "zenith={}", pos.zenith);
    assert!(pos.altitude > 85.0, "altitude={}", pos.altitude);
}

#[test]
fn test_polar_summer_and_winter() {
    let loc = at(70.0, 15.0, 1.0);
    let summer = solar_position(&loc, 6, 21, 12.0, false);
    let winter = solar_position(&loc, 12, 21, 12.0, false);
    assert!(summer.is_sun_up());
    assert!(!winter.is_sun_up());
    assert!(winter.air_mass.is_none());
}

#[test]
fn test_southern_hemisphere_reversed_seasons() {
    let sydney = at(-33.9, 151.2, 10.0);
    let jun = solar_position(&sydney, 6, 21, 12.0, false);
    let dec = solar_position(&sydney, 12, 21, 12.0, false);
    assert!(jun.altitude < dec.altitude);
    // Noon sun is to the north.
    assert!(jun.azimuth > 270.0 || jun.azimuth < 90.0, "azimuth={}", jun.azimuth);
}

#[test]
fn test_midnight_below_horizon() {
    let pos = solar_position(&springfield(), 3, 21, 0.0, false);
    assert!(pos.altitude < 0.0);
    assert!(pos.zenith > 90.0);
    assert!(pos.air_mass.is_none());
}

// ── Invariants over many positions ──

#[test]
fn test_zenith_altitude_complement_and_azimuth_range() {
    let cases: &[(Location, u32, u32, f64)] = &[
        (springfield(), 1, 15, 8.0),
        (springfield(), 7, 15, 20.0),
        (at(0.0, 0.0, 0.0), 6, 21, 12.0),
        (at(-33.9, 151.2, 10.0), 12, 21, 15.5),
        (at(51.5, -0.1, 0.0), 9, 22, 8.0),
        (at(70.0, 25.0, 2.0), 6, 21, 18.0),
        (at(-45.0, 170.0, 12.0), 3, 21, 12.0),
    ];
    for (loc, month, day, hour) in cases {
        let pos = solar_position(loc, *month, *day, *hour, false);
        assert_approx!(pos.zenith + pos.altitude, 90.0, 1e-10);
        assert!((0.0..360.0).contains(&pos.azimuth), "azimuth={}", pos.azimuth);
    }
}

// ── AirMass ──

#[test]
fn test_relative_air_mass() {
    assert!(relative_air_mass(0.0).is_none());
    assert!(relative_air_mass(-10.0).is_none());
    assert_approx!(relative_air_mass(90.0).unwrap(), 1.0, 1e-3);
    assert_approx!(relative_air_mass(30.0).unwrap(), 2.0, 0.01);
    assert!(relative_air_mass(1.0).unwrap() > 20.0);
}

// ── AngleOfIncidence ──

#[test]
fn test_horizontal_surface_incidence_is_sin_altitude() {
    let pos = springfield_equinox();
    for azimuth in [0.0, 90.0, 180.0, 270.0, 33.3] {
        assert_eq!(
            cos_angle_of_incidence(&pos, azimuth, 0.0),
            deg_to_rad(pos.altitude).sin()
        );
    }
}

#[test]
fn test_surface_facing_sun() {
    let pos = springfield_equinox();
    let aoi = angle_of_incidence(&pos, pos.azimuth, pos.zenith);
    assert_approx!(aoi, 0.0, 1e-4);
}

#[test]
fn test_vertical_surface_facing_away() {
    let pos = springfield_equinox();
    let north = cos_angle_of_incidence(&pos, 0.0, 90.0);
    assert!(north < 0.0);
}
