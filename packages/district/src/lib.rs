#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable district registry.
//!
//! The registry is built once at startup from TOML reference data (the
//! Santa Cruz de la Sierra table is embedded at compile time) and shared
//! read-only across every analysis. District names are translated to dense
//! [`DistrictId`] indices so adjacency checks are a single array lookup.

mod overview;
mod registry;

use std::path::PathBuf;

use thiserror::Error;

pub use overview::baseline_risk;
pub use registry::{DistrictId, DistrictRegistry};

/// Environment variable naming a TOML file that replaces the embedded
/// reference data.
pub const DISTRICTS_PATH_ENV: &str = "DISTRICTS_PATH";

/// Errors that can occur while loading or validating district reference data.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The reference data file could not be read.
    #[error("Failed to read district data from {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The TOML did not match the district table schema.
    #[error("Failed to parse district data: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two entries share the same name.
    #[error("Duplicate district: {name}")]
    DuplicateDistrict {
        /// The repeated district name.
        name: String,
    },

    /// An adjacency entry names a district that is not in the table.
    #[error("District {district} lists unknown adjacent district {adjacent}")]
    UnknownAdjacent {
        /// District whose adjacency list is invalid.
        district: String,
        /// The name that could not be resolved.
        adjacent: String,
    },

    /// A district lists itself as adjacent.
    #[error("District {district} lists itself as adjacent")]
    SelfAdjacent {
        /// The offending district.
        district: String,
    },

    /// A numeric field is zero, negative or not finite.
    #[error("District {district} has invalid {field}")]
    InvalidMeasure {
        /// The offending district.
        district: String,
        /// Field name (`population`, `area_km2`, ...).
        field: &'static str,
    },
}
