mod builder;
mod flow;
mod options;
pub mod stages;

use thiserror::Error;

pub use flow::{Flow, StageKind};
pub use options::{
    Discretisation, FlightConditions, GustDescriptor, GustShape, KrylovRom, Numerics,
    SimulationOptions,
};
pub use stages::{CaseSettings, GustInput, SimulationHeader, VelocityField};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read case file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Flow is empty")]
    EmptyFlow,
    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f64),
    #[error("Flow names both the static trim and the static coupled stage")]
    ConflictingStaticStages,
    #[error("{stage} requires a preceding {requires} stage in the flow")]
    MissingPrerequisite { stage: StageKind, requires: StageKind },
    #[error("Gust requested with a non-positive freestream speed")]
    GustWithoutFreestream,
    #[error("No settings entry for flow stage {0}")]
    MissingStage(StageKind),
    #[error("The {0} model has not been initialised")]
    ModelNotInitialised(&'static str),
}
