use nrel_resource::{NrelClient, NrelConfig, ResourceError, ResourceRecord, SolarResource};
use std::sync::Arc;

fn main() -> Result<(), ResourceError> {
    // RUST_LOG=info shows cache hits and downloads
    env_logger::init();

    // NREL_API_KEY and NREL_API_EMAIL must be set
    let client = NrelClient::new(NrelConfig::from_env())?;

    let mut resource = SolarResource::builder()
        .lat(39.7555)
        .lon(-105.2211)
        .year(2012)
        .provider(Arc::new(client))
        .build()?;

    if !resource.download_resource(false)? {
        eprintln!("No NSRDB data for {} in {}", resource.location(), resource.year());
        return Ok(());
    }
    println!("Solar resource cached at {}", resource.filename().display());

    let data = resource.data()?;
    let peak = data.gh.iter().copied().fold(0.0, f64::max);
    let mean_temp = data.tdry.iter().sum::<f64>() / data.len() as f64;
    println!("{} timesteps, tz {}, elevation {} m", data.len(), data.tz, data.elev);
    println!("Peak GHI {peak:.0} W/m2, mean temperature {mean_temp:.1} C");
    if let Some(first) = data.timestamps().into_iter().flatten().next() {
        println!("First timestep at {first}");
    }

    Ok(())
}
