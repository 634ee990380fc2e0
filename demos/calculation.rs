use std::sync::Arc;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use solar_irradiance::{
    ClearSkyConfig, HoursFile, Location, Surface, Wea, DEFAULT_OPTICAL_DEPTHS,
};

fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;

    let location = Arc::new(Location::new(
        "Chicago", "TMY3", "USA", 41.98, -87.92, -6.0, 201.0,
    ));
    let wea = Wea::from_ashrae_clear_sky(
        Arc::clone(&location),
        &DEFAULT_OPTICAL_DEPTHS,
        &ClearSkyConfig::default(),
    )?;

    let noon = 12;
    let pos = wea.solar_positions()[noon];
    let ghi = wea.global_horizontal_irradiance()?;

    println!("=== Clear-Sky Irradiance Example ===");
    println!(
        "Location: {} ({:.2}°N, {:.2}°W, UTC{:+})",
        location.city, location.latitude, -location.longitude, location.utc_offset
    );
    println!("Date/Time: Jan 1, 12:00 local standard time");
    println!();
    println!("--- Solar Position ---");
    println!("Altitude: {:.2}°", pos.altitude);
    println!("Azimuth: {:.2}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
    if let Some(m) = pos.air_mass {
        println!("Air mass: {:.3}", m);
    }
    println!();
    println!("--- Horizontal Irradiance (W/m²) ---");
    println!("Direct normal: {:.1}", wea.direct_normal_irradiance()[noon]);
    println!("Diffuse horizontal: {:.1}", wea.diffuse_horizontal_irradiance()[noon]);
    println!("Global horizontal: {:.1}", ghi[noon]);
    println!("Annual global: {:.1} kWh/m²", ghi.total() / 1000.0);

    let surface = Surface {
        azimuth: 180.0,
        tilt: 30.0,
        ground_reflectance: 0.2,
    };
    let tilted = wea.directional_irradiance_with(&surface)?;
    println!();
    println!("--- South-facing 30° surface (W/m²) ---");
    println!("Direct: {:.1}", tilted.direct[noon]);
    println!("Diffuse: {:.1}", tilted.diffuse[noon]);
    println!("Ground reflected: {:.1}", tilted.ground_reflected[noon]);
    println!("Total: {:.1}", tilted.total[noon]);
    println!("Annual total: {:.1} kWh/m²", tilted.total.total() / 1000.0);

    let path = std::env::temp_dir().join("chicago_clear_sky.wea");
    wea.write(&path, &wea.sun_up_hours(), true)?;
    let back = Wea::from_file(&path, 1, false)?;
    let hours = HoursFile::from_file(path.with_extension("hrs"))?;
    println!();
    println!("--- WEA round trip ---");
    println!("Wrote {} ({} sun-up hours)", path.display(), hours.len());
    println!(
        "Read back noon DNI: {:.3}",
        back.direct_normal_irradiance()[noon]
    );

    Ok(())
}
