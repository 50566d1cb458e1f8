pub mod aggregation;
pub mod dataset;
mod dates;
pub mod db;
mod error;
pub mod routes;
mod startup;
mod utils;

pub use aggregation::*;
pub use dataset::Dataset;
pub use dates::*;
pub use db::{
    Observation, ObservationStore, SqliteStore, Station, StationActivity, TemperatureSummary,
};
pub use error::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
