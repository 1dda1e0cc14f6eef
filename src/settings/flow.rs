use core::fmt;
use serde::{Deserialize, Serialize};

/// Enumeration of the solver stages understood by the external aeroelastic
/// solver. The serialized names match the stage identifiers the solver
/// expects in its settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    BeamLoader,
    AerogridLoader,
    NonLinearStatic,
    StaticUvlm,
    StaticCoupled,
    StaticTrim,
    BeamLoads,
    BeamPlot,
    AerogridPlot,
    AeroForcesCalculator,
    NonLinearDynamicCoupledStep,
    NonLinearDynamicPrescribedStep,
    StepUvlm,
    DynamicCoupled,
    Modal,
    LinearAssembler,
    AsymptoticStability,
    LiftDistribution,
    SaveData,
}

impl StageKind {
    /// The stage identifier as it appears in the solver settings file.
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::BeamLoader => "BeamLoader",
            StageKind::AerogridLoader => "AerogridLoader",
            StageKind::NonLinearStatic => "NonLinearStatic",
            StageKind::StaticUvlm => "StaticUvlm",
            StageKind::StaticCoupled => "StaticCoupled",
            StageKind::StaticTrim => "StaticTrim",
            StageKind::BeamLoads => "BeamLoads",
            StageKind::BeamPlot => "BeamPlot",
            StageKind::AerogridPlot => "AerogridPlot",
            StageKind::AeroForcesCalculator => "AeroForcesCalculator",
            StageKind::NonLinearDynamicCoupledStep => "NonLinearDynamicCoupledStep",
            StageKind::NonLinearDynamicPrescribedStep => "NonLinearDynamicPrescribedStep",
            StageKind::StepUvlm => "StepUvlm",
            StageKind::DynamicCoupled => "DynamicCoupled",
            StageKind::Modal => "Modal",
            StageKind::LinearAssembler => "LinearAssembler",
            StageKind::AsymptoticStability => "AsymptoticStability",
            StageKind::LiftDistribution => "LiftDistribution",
            StageKind::SaveData => "SaveData",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of solver stages defining the execution sequence of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow(Vec<StageKind>);

impl Flow {
    pub fn new(stages: Vec<StageKind>) -> Self {
        Self(stages)
    }

    /// Standard flow for a dynamic gust-response case. `use_trim` selects the
    /// trim search over the plain static coupled solution, never both.
    pub fn gust_response(use_trim: bool) -> Self {
        let static_stage = if use_trim {
            StageKind::StaticTrim
        } else {
            StageKind::StaticCoupled
        };
        Self(vec![
            StageKind::BeamLoader,
            StageKind::AerogridLoader,
            static_stage,
            StageKind::BeamLoads,
            StageKind::BeamPlot,
            StageKind::AerogridPlot,
            StageKind::AeroForcesCalculator,
            StageKind::DynamicCoupled,
        ])
    }

    /// Standard flow for linearised state-space extraction.
    pub fn linear_assembly() -> Self {
        Self(vec![
            StageKind::BeamLoader,
            StageKind::Modal,
            StageKind::AerogridLoader,
            StageKind::StaticCoupled,
            StageKind::DynamicCoupled,
            StageKind::Modal,
            StageKind::LinearAssembler,
            StageKind::SaveData,
        ])
    }

    pub fn contains(&self, stage: StageKind) -> bool {
        self.0.contains(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageKind> {
        self.0.iter()
    }

    /// Stage names in execution order, as written to the settings header.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|s| s.name().to_string()).collect()
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|s| s.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gust_response_flow_selects_trim_stage() {
        let trimmed = Flow::gust_response(true);
        let untrimmed = Flow::gust_response(false);

        assert!(trimmed.contains(StageKind::StaticTrim));
        assert!(!trimmed.contains(StageKind::StaticCoupled));
        assert!(untrimmed.contains(StageKind::StaticCoupled));
        assert!(!untrimmed.contains(StageKind::StaticTrim));
    }

    #[test]
    fn linear_assembly_flow_runs_modal_before_assembler() {
        let flow = Flow::linear_assembly();
        let stages: Vec<StageKind> = flow.iter().copied().collect();
        let modal = stages
            .iter()
            .position(|s| *s == StageKind::Modal)
            .expect("flow has a modal stage");
        let assembler = stages
            .iter()
            .position(|s| *s == StageKind::LinearAssembler)
            .expect("flow has a linear assembler stage");

        assert!(modal < assembler);
    }

    #[test]
    fn stage_names_serialize_as_solver_identifiers() {
        let json = serde_json::to_string(&StageKind::NonLinearDynamicCoupledStep).unwrap();
        assert_eq!(json, "\"NonLinearDynamicCoupledStep\"");
    }
}
