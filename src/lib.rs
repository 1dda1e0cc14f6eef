pub mod algebra;
pub mod case;
pub mod model;
pub mod postprocess;
pub mod settings;

pub use case::{CaseError, GustResponseCase, LinearSystemCase, PreparedCase};
pub use model::{AeroModel, AeroParams, FlexopModel, ModelError, StructureModel, StructureParams};
pub use postprocess::{ResultsError, ResultsFile, TimeHistory};
pub use settings::{CaseSettings, ConfigError, Flow, SimulationOptions, StageKind};
