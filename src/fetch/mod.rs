pub mod error;
pub mod fetcher;
pub mod nrel;
pub mod provider;
