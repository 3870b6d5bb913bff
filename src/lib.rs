mod cache_path;
mod combine;
mod config;
mod error;
mod fetch;
mod parser;
mod resource;
mod types;
mod utils;

pub use error::ResourceError;
pub use fetch::error::FetchError;
pub use parser::error::ParseError;

pub use config::NrelConfig;
pub use fetch::fetcher::{FetchOutcome, ResourceFetcher};
pub use fetch::nrel::NrelClient;
pub use fetch::provider::{FetchRequest, ResourceProvider};

pub use cache_path::CacheNaming;
pub use combine::{
    heights_to_download, select_heights, CombinedFile, HeightCombiner, HeightSource, WTK_HEIGHTS,
};

pub use parser::{
    parse_file, parse_solar_file, parse_solar_str, parse_wind_file, parse_wind_str,
    write_wind_file, ParsedResource,
};

pub use resource::solar::SolarResource;
pub use resource::wind::WindResource;
pub use resource::{ResourceRecord, ResourceState, DEFAULT_INTERVAL};

pub use types::location::LatLon;
pub use types::resource_kind::ResourceKind;
pub use types::solar_data::{SolarData, SolarField, SOLAR_KEYS};
pub use types::wind_data::{SrwHeader, WindData, WindField, WIND_KEYS};

pub use utils::get_cache_dir;
