pub mod location;
pub mod resource_kind;
pub mod solar_data;
pub mod wind_data;
