use nrel_resource::{ResourceError, ResourceRecord, WindField, WindResource};

fn main() -> Result<(), ResourceError> {
    env_logger::init();

    // 110 m sits between the published 100 m and 120 m heights, so both are
    // downloaded and merged into one file.
    let mut resource = WindResource::builder()
        .lat(39.7555)
        .lon(-105.2211)
        .year(2012)
        .hub_height(110.0)
        .build()?;
    println!(
        "Hub height {} m uses published heights {:?}",
        resource.hub_height(),
        resource.heights()
    );

    println!("Reading {}", resource.filename().display());

    let data = resource.data()?;
    for height in data.distinct_heights() {
        if let Some(speed) = data.column(WindField::Speed, height) {
            let mean = speed.iter().sum::<f64>() / speed.len().max(1) as f64;
            println!("{height:>5} m: mean wind speed {mean:.2} m/s");
        }
    }

    Ok(())
}
