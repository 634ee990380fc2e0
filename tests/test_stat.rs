use std::path::PathBuf;

use solar_irradiance::{ClearSkyConfig, Error, StatFile, Wea};

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

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ── Header ──

#[test]
fn test_chicago_location() {
    let stat = StatFile::from_file(fixture("chicago.stat")).unwrap();
    let location = stat.location();
    assert_eq!(location.city, "CHICAGO OHARE INTL AP");
    assert_eq!(location.state, "IL");
    assert_eq!(location.country, "USA");
    assert_eq!(location.source, "TMY3");
    assert_eq!(location.station_id, "725300");
    assert_approx!(location.latitude, 41.0 + 58.0 / 60.0, 1e-9);
    assert_approx!(location.longitude, -(87.0 + 54.0 / 60.0), 1e-9);
    assert_eq!(location.utc_offset, -6.0);
    assert_eq!(location.elevation, 201.0);
    assert_eq!(stat.standard_pressure(), Some(98934.0));
}

#[test]
fn test_climate_zones() {
    let stat = StatFile::from_file(fixture("chicago.stat")).unwrap();
    assert_eq!(stat.ashrae_climate_zone(), Some("5A"));
    assert_eq!(stat.koppen_climate_zone(), Some("Dfa"));
}

#[test]
fn test_international_name_and_below_sea_level() {
    let stat = StatFile::from_file(fixture("partial.stat")).unwrap();
    let location = stat.location();
    assert_eq!(location.city, "Dead Sea Station");
    assert_eq!(location.country, "ISR");
    assert_eq!(location.elevation, -390.0);
    assert_eq!(location.utc_offset, 2.0);
    assert!(location.longitude > 0.0);
    assert_eq!(stat.ashrae_climate_zone(), None);
}

#[test]
fn test_latin1_degree_sign() {
    let mut bytes = std::fs::read(fixture("chicago.stat")).unwrap();
    // Re-encode the UTF-8 degree sign (C2 B0) as Latin-1 (B0).
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == 0xC2 && bytes[i + 1] == 0xB0 {
            bytes.remove(i);
        }
        i += 1;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.stat");
    std::fs::write(&path, &bytes).unwrap();
    let stat = StatFile::from_file(&path).unwrap();
    assert_approx!(stat.location().latitude, 41.0 + 58.0 / 60.0, 1e-9);
}

// ── Optical depths ──

#[test]
fn test_monthly_optical_depths() {
    let stat = StatFile::from_file(fixture("chicago.stat")).unwrap();
    assert_eq!(stat.monthly_tau_beam().len(), 12);
    assert_eq!(stat.monthly_tau_beam()[0], Some(0.305));
    assert_eq!(stat.monthly_tau_diffuse()[0], Some(2.37));
    assert_eq!(stat.monthly_tau_diffuse()[11], Some(2.577));
    let depths = stat.optical_depths().unwrap();
    assert_eq!(depths.for_month(7), (0.445, 1.998));
}

#[test]
fn test_missing_table_message() {
    let stat = StatFile::from_file(fixture("santamonica.stat")).unwrap();
    assert!(stat.monthly_tau_beam().is_empty());
    let err = stat.optical_depths().unwrap_err();
    assert!(matches!(err, Error::NoOpticalData));
    assert_eq!(err.to_string(), "Stat file contains no optical data.");
}

#[test]
fn test_missing_month() {
    let stat = StatFile::from_file(fixture("partial.stat")).unwrap();
    assert_eq!(stat.monthly_tau_beam()[4], None);
    assert!(matches!(
        stat.optical_depths(),
        Err(Error::MissingOpticalDepth {
            name: "monthly_tau_beam",
            month: 5
        })
    ));
}

#[test]
fn test_parse_requires_location() {
    assert!(matches!(
        "no header here".parse::<StatFile>(),
        Err(Error::StatParse(_))
    ));
}

// ── Wea from STAT ──

#[test]
fn test_wea_from_stat_file() {
    let wea = Wea::from_stat_file(fixture("chicago.stat")).unwrap();
    assert_eq!(wea.timestep(), 1);
    assert_eq!(wea.len(), 8760);
    assert_approx!(wea.direct_normal_irradiance()[12], 810.693919, 810.693919 * 1e-3);
    assert_approx!(wea.diffuse_horizontal_irradiance()[12], 87.44171, 87.44171 * 1e-3);
    // July 15 noon uses the July depths.
    let july = (181 + 14) * 24 + 12;
    assert_approx!(wea.direct_normal_irradiance()[july], 829.7, 829.7 * 0.01);
    assert_approx!(wea.diffuse_horizontal_irradiance()[july], 173.6, 173.6 * 0.01);
}

#[test]
fn test_wea_from_stat_without_table() {
    match Wea::from_stat_file(fixture("santamonica.stat")) {
        Err(err) => assert_eq!(err.to_string(), "Stat file contains no optical data."),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn test_wea_from_stat_with_config() {
    let stat = StatFile::from_file(fixture("chicago.stat")).unwrap();
    let config = ClearSkyConfig {
        timestep: 2,
        ..ClearSkyConfig::default()
    };
    let wea = Wea::from_stat(&stat, &config).unwrap();
    assert_eq!(wea.len(), 17520);
    assert_eq!(wea.location().city, "CHICAGO OHARE INTL AP");
}
