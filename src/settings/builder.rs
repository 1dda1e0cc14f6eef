//! Assembles the per-stage settings set for a case.
//!
//! Pure function of the aircraft model geometry, the flow and the case
//! options; the conditional branches (free flight vs clamped, steady vs
//! gust velocity field, linear assembly requested) select which entries
//! are populated and how they reference each other.

use nalgebra::Vector3;

use crate::algebra::euler_to_quat;
use crate::model::FlexopModel;
use crate::settings::stages::*;
use crate::settings::{ConfigError, Flow, GustShape, SimulationOptions, StageKind};

const GRAVITY: f64 = 9.81;

impl CaseSettings {
    /// Builds the full settings set for `model` running `flow` at timestep
    /// `dt`. Every stage the flow names ends up with an entry; stages not in
    /// the flow but referenced by coupled stages are populated too.
    pub fn assemble(
        model: &FlexopModel,
        flow: &Flow,
        dt: f64,
        options: &SimulationOptions,
    ) -> Result<CaseSettings, ConfigError> {
        validate(flow, dt, options)?;

        let aero = model
            .aero()
            .ok_or(ConfigError::ModelNotInitialised("aerodynamic"))?;

        let conditions = &options.conditions;
        let numerics = &options.numerics;
        let discretisation = &options.discretisation;
        let linear = flow.contains(StageKind::LinearAssembler);

        let header = SimulationHeader {
            case: model.case_name().to_string(),
            route: model.case_route(),
            flow: flow.names(),
            write_screen: true,
            write_log: true,
            log_folder: model.output_route().to_path_buf(),
            log_file: format!("{}.log", model.case_name()),
        };

        let beam_loader = BeamLoaderSettings {
            unsteady: true,
            orientation: euler_to_quat(&Vector3::new(0.0, conditions.alpha, 0.0)),
        };

        let non_linear_static = NonLinearStaticSettings {
            print_info: false,
            max_iterations: 150,
            num_load_steps: 1,
            delta_curved: 1e-1,
            min_delta: numerics.tolerance,
            gravity_on: options.gravity,
            gravity: GRAVITY,
        };

        let static_uvlm = StaticUvlmSettings {
            print_info: true,
            horseshoe: discretisation.horseshoe,
            num_cores: numerics.num_cores,
            n_rollup: 0,
            velocity_field: VelocityField::Steady(SteadyVelocityField {
                u_inf: conditions.u_inf,
                u_inf_direction: [1.0, 0.0, 0.0],
            }),
            rho: conditions.rho,
            cfl1: discretisation.cfl1(),
        };

        let static_coupled = StaticCoupledSettings {
            print_info: false,
            structural_solver: StageKind::NonLinearStatic,
            structural_solver_settings: non_linear_static.clone(),
            aero_solver: StageKind::StaticUvlm,
            aero_solver_settings: static_uvlm.clone(),
            max_iter: 100,
            n_load_steps: numerics.n_load_steps,
            tolerance: numerics.fsi_tolerance,
            relaxation_factor: numerics.structural_relaxation_factor,
        };

        let static_trim = StaticTrimSettings {
            solver: StageKind::StaticCoupled,
            solver_settings: static_coupled.clone(),
            initial_alpha: conditions.alpha,
            initial_deflection: conditions.cs_deflection,
            initial_thrust: conditions.thrust,
            tail_cs_index: vec![4, 10],
            thrust_nodes: vec![0],
            fz_tolerance: 1e-6,
            fx_tolerance: 1e-6,
            m_tolerance: 1e-6,
            save_info: true,
        };

        let aerogrid_loader = AerogridLoaderSettings {
            unsteady: true,
            aligned_grid: true,
            mstar: if discretisation.horseshoe {
                1
            } else {
                discretisation.wake_length * aero.m
            },
            wake_shape_generator: "StraightWake".to_string(),
            wake_shape_generator_input: StraightWakeInput {
                u_inf: conditions.u_inf,
                u_inf_direction: [1.0, 0.0, 0.0],
                dt,
            },
        };

        let dynamic_step = |initial_velocity: Option<f64>| DynamicStepSettings {
            print_info: false,
            max_iterations: 950,
            delta_curved: 1e-1,
            min_delta: numerics.tolerance,
            newmark_damp: numerics.newmark_damp,
            gravity_on: options.gravity,
            gravity: GRAVITY,
            num_steps: numerics.n_tstep,
            dt,
            initial_velocity,
        };
        let coupled_step = dynamic_step(Some(conditions.u_inf));
        let prescribed_step = dynamic_step(None);

        let step_uvlm = StepUvlmSettings {
            num_cores: numerics.num_cores,
            convection_scheme: 2,
            gamma_dot_filtering: 7,
            cfl1: discretisation.cfl1(),
            velocity_field: step_velocity_field(options),
            rho: conditions.rho,
            n_time_steps: numerics.n_tstep,
            dt,
        };

        let save_data = SaveDataSettings {
            save_aero: true,
            save_struct: true,
            save_linear: linear,
            save_linear_uvlm: linear,
            save_rom: linear && options.rom.is_some(),
        };

        let structural_solver = if options.free_flight {
            StageKind::NonLinearDynamicCoupledStep
        } else {
            StageKind::NonLinearDynamicPrescribedStep
        };
        let structural_solver_settings = if options.free_flight {
            coupled_step.clone()
        } else {
            prescribed_step.clone()
        };

        let dynamic_coupled = DynamicCoupledSettings {
            structural_solver,
            structural_solver_settings,
            aero_solver: StageKind::StepUvlm,
            aero_solver_settings: step_uvlm.clone(),
            fsi_substeps: 200,
            fsi_tolerance: numerics.fsi_tolerance,
            relaxation_factor: numerics.relaxation_factor,
            minimum_steps: 1,
            relaxation_steps: 150,
            final_relaxation_factor: 0.05,
            n_time_steps: numerics.n_tstep,
            dt,
            // The unsteady force distribution is dropped when the case is
            // linearised afterwards.
            include_unsteady_force_contribution: !linear,
            postprocessors: options.postprocessors.clone(),
            postprocessors_settings: PostprocessorSettings {
                beam_loads: options
                    .postprocessors
                    .contains(&StageKind::BeamLoads)
                    .then(|| BeamLoadsSettings { csv_output: false }),
                save_data: options
                    .postprocessors
                    .contains(&StageKind::SaveData)
                    .then(|| save_data.clone()),
            },
        };

        let modal = ModalSettings {
            print_info: true,
            use_undamped_modes: true,
            num_lambda: options.num_modes,
            rigid_body_modes: options.free_flight,
            write_modes_vtk: true,
            print_matrices: true,
            continuous_eigenvalues: false,
            dt,
            plot_eigenvalues: false,
        };

        let linear_assembler = linear.then(|| linear_assembler_settings(dt, options));

        let asymptotic_stability = AsymptoticStabilitySettings {
            print_info: true,
            frequency_cutoff: 0.0,
            export_eigenvalues: true,
            modes_to_plot: options.num_modes,
            velocity_analysis: [20.0, 80.0, 13.0],
        };

        let settings = CaseSettings {
            simulation: header,
            beam_loader: Some(beam_loader),
            aerogrid_loader: Some(aerogrid_loader),
            non_linear_static: Some(non_linear_static),
            static_uvlm: Some(static_uvlm),
            static_coupled: Some(static_coupled),
            static_trim: Some(static_trim),
            beam_loads: Some(BeamLoadsSettings { csv_output: true }),
            beam_plot: Some(BeamPlotSettings::default()),
            aerogrid_plot: Some(AerogridPlotSettings {
                include_rbm: false,
                include_applied_forces: true,
                minus_m_star: 0,
                u_inf: conditions.u_inf,
            }),
            aero_forces_calculator: Some(AeroForcesCalculatorSettings {
                coefficients: false,
            }),
            non_linear_dynamic_coupled_step: Some(coupled_step),
            non_linear_dynamic_prescribed_step: Some(prescribed_step),
            step_uvlm: Some(step_uvlm),
            dynamic_coupled: Some(dynamic_coupled),
            modal: Some(modal),
            linear_assembler,
            asymptotic_stability: Some(asymptotic_stability),
            lift_distribution: Some(LiftDistributionSettings {
                rho: conditions.rho,
            }),
            save_data: Some(save_data),
        };

        settings
            .validate_flow(flow)
            .map_err(ConfigError::MissingStage)?;

        Ok(settings)
    }
}

fn validate(flow: &Flow, dt: f64, options: &SimulationOptions) -> Result<(), ConfigError> {
    if flow.is_empty() {
        return Err(ConfigError::EmptyFlow);
    }
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(ConfigError::InvalidTimestep(dt));
    }
    if flow.contains(StageKind::StaticTrim) && flow.contains(StageKind::StaticCoupled) {
        return Err(ConfigError::ConflictingStaticStages);
    }
    if flow.contains(StageKind::LinearAssembler) && !flow.contains(StageKind::Modal) {
        return Err(ConfigError::MissingPrerequisite {
            stage: StageKind::LinearAssembler,
            requires: StageKind::Modal,
        });
    }
    if options.gust.is_some() && options.conditions.u_inf <= 0.0 {
        return Err(ConfigError::GustWithoutFreestream);
    }
    Ok(())
}

/// Velocity field of the unsteady aerodynamic stage: the gust generator when
/// a gust is requested, otherwise the steady freestream. In free flight the
/// steady freestream is applied through the rigid-body velocity instead of
/// the velocity field, and the gust moves with the inertial frame.
fn step_velocity_field(options: &SimulationOptions) -> VelocityField {
    let u_inf = options.conditions.u_inf;
    match &options.gust {
        Some(gust) => VelocityField::Gust(GustVelocityField {
            u_inf,
            u_inf_direction: [1.0, 0.0, 0.0],
            relative_motion: !options.free_flight,
            offset: gust.offset,
            gust: match &gust.shape {
                GustShape::OneMinusCosine { length, intensity } => GustInput::OneMinusCosine {
                    gust_length: *length,
                    // The descriptor carries the intensity as a fraction of
                    // the freestream speed; the solver wants it absolute.
                    gust_intensity: intensity * u_inf,
                },
                GustShape::TimeVarying { file, components } => GustInput::TimeVarying {
                    file: file.clone(),
                    gust_component: components.clone(),
                },
            },
        }),
        None => VelocityField::Steady(SteadyVelocityField {
            u_inf: if options.free_flight { 0.0 } else { u_inf },
            u_inf_direction: [1.0, 0.0, 0.0],
        }),
    }
}

fn linear_assembler_settings(dt: f64, options: &SimulationOptions) -> LinearAssemblerSettings {
    LinearAssemblerSettings {
        linear_system: "LinearAeroelastic".to_string(),
        inout_coordinates: "nodes".to_string(),
        linear_system_settings: LinearAeroelasticSettings {
            beam_settings: LinearBeamSettings {
                modal_projection: true,
                inout_coords: "modes".to_string(),
                discrete_time: true,
                newmark_damp: options.numerics.newmark_damp,
                discr_method: "newmark".to_string(),
                dt,
                proj_modes: "undamped".to_string(),
                num_modes: options.num_modes,
                print_info: true,
                gravity: options.gravity,
                remove_dofs: Vec::new(),
            },
            aero_settings: LinearUvlmSettings {
                dt,
                integr_order: 2,
                density: options.conditions.rho,
                remove_predictor: true,
                use_sparse: false,
                gust_assembler: "LeadingEdge".to_string(),
                rom: options.rom.as_ref().map(|rom| RomRequest {
                    rom_method: vec!["Krylov".to_string()],
                    rom_method_settings: [("Krylov".to_string(), rom.clone())]
                        .into_iter()
                        .collect(),
                }),
            },
            track_body: options.free_flight,
            use_euler: options.free_flight,
        },
        remove_inputs: if options.remove_gust_input_in_statespace {
            vec!["u_gust".to_string()]
        } else {
            Vec::new()
        },
    }
}
