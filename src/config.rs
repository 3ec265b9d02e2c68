// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (PULSECTRL_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::pulsegen::PulseType;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Optimization settings
    #[serde(default)]
    pub optim: OptimConfig,

    /// Output settings (amplitude files, plots, JSON summary)
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Resource limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["config.yaml", "config.yml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PULSECTRL_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("PULSECTRL_FID_ERR_TARG") {
            if let Ok(targ) = val.parse() {
                self.optim.fid_err_targ = targ;
            }
        }
        if let Ok(val) = env::var("PULSECTRL_MAX_ITER") {
            if let Ok(iters) = val.parse() {
                self.optim.max_iter = iters;
            }
        }
        if let Ok(val) = env::var("PULSECTRL_MAX_WALL_TIME") {
            if let Ok(secs) = val.parse() {
                self.optim.max_wall_time_s = secs;
            }
        }
        if let Ok(val) = env::var("PULSECTRL_OUTPUT_DIR") {
            self.output.directory = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.optim.validate()?;
        if self.optim.max_iter > self.limits.max_iterations {
            return Err(Error::Config(format!(
                "max_iter {} exceeds limit {}",
                self.optim.max_iter, self.limits.max_iterations
            )));
        }
        if self.optim.num_tslots as u64 > self.limits.max_tslots {
            return Err(Error::Config(format!(
                "num_tslots {} exceeds limit {}",
                self.optim.num_tslots, self.limits.max_tslots
            )));
        }
        Ok(())
    }
}

/// Pulse optimization settings.
///
/// Mirrors the parameters of the demonstration workflow: fidelity error
/// target, iteration and wall-time limits, gradient threshold, time
/// discretization and initial pulse shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimConfig {
    /// Number of piecewise-constant timeslots
    #[serde(default = "default_num_tslots")]
    pub num_tslots: usize,

    /// Total evolution time (natural units)
    #[serde(default = "default_evo_time")]
    pub evo_time: f64,

    /// Target fidelity error; optimization stops when reached
    #[serde(default = "default_fid_err_targ")]
    pub fid_err_targ: f64,

    /// Maximum number of optimizer iterations
    #[serde(default = "default_max_iter")]
    pub max_iter: u64,

    /// Maximum wall time in seconds
    #[serde(default = "default_max_wall_time")]
    pub max_wall_time_s: f64,

    /// Minimum gradient norm; below this the search is considered stuck
    #[serde(default = "default_min_grad")]
    pub min_grad: f64,

    /// Number of parameter updates retained by the L-BFGS history
    #[serde(default = "default_lbfgs_memory")]
    pub lbfgs_memory: usize,

    /// Initial pulse shape
    #[serde(default)]
    pub init_pulse: InitPulseConfig,
}

impl Default for OptimConfig {
    fn default() -> Self {
        Self {
            num_tslots: default_num_tslots(),
            evo_time: default_evo_time(),
            fid_err_targ: default_fid_err_targ(),
            max_iter: default_max_iter(),
            max_wall_time_s: default_max_wall_time(),
            min_grad: default_min_grad(),
            lbfgs_memory: default_lbfgs_memory(),
            init_pulse: InitPulseConfig::default(),
        }
    }
}

impl OptimConfig {
    /// Validate optimization parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_tslots == 0 {
            return Err(Error::Config("num_tslots must be > 0".into()));
        }
        if self.evo_time <= 0.0 {
            return Err(Error::Config("evo_time must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.fid_err_targ) {
            return Err(Error::Config("fid_err_targ must be in [0, 1]".into()));
        }
        if self.max_iter == 0 {
            return Err(Error::Config("max_iter must be > 0".into()));
        }
        if self.max_wall_time_s <= 0.0 {
            return Err(Error::Config("max_wall_time_s must be > 0".into()));
        }
        if self.min_grad < 0.0 {
            return Err(Error::Config("min_grad must be >= 0".into()));
        }
        if self.lbfgs_memory == 0 {
            return Err(Error::Config("lbfgs_memory must be > 0".into()));
        }
        Ok(())
    }
}

/// Initial pulse shape settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitPulseConfig {
    /// Shape selector (RND, ZERO, LIN, SINE, SQUARE, SAW)
    #[serde(default)]
    pub pulse_type: PulseType,

    /// Amplitude scaling applied to the generated shape
    #[serde(default = "default_pulse_scaling")]
    pub scaling: f64,

    /// Constant offset added to the generated shape
    #[serde(default)]
    pub offset: f64,

    /// RNG seed for reproducible random pulses
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for InitPulseConfig {
    fn default() -> Self {
        Self {
            pulse_type: PulseType::default(),
            scaling: default_pulse_scaling(),
            offset: 0.0,
            seed: None,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for amplitude files, plots and summaries
    #[serde(default = "default_output_dir")]
    pub directory: String,

    /// Suffix for amplitude file names
    /// (ctrl_amps_initial_<ext>, ctrl_amps_final_<ext>)
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Write initial/final amplitude files
    #[serde(default)]
    pub write_amps: bool,

    /// Render the pulse plot
    #[serde(default)]
    pub plot: bool,

    /// Write the JSON result summary (summary_<ext stem>.json)
    #[serde(default)]
    pub json_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file_ext: default_file_ext(),
            write_amps: false,
            plot: false,
            json_summary: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum Hilbert space dimension
    #[serde(default = "default_max_hilbert_dim")]
    pub max_hilbert_dim: u64,

    /// Maximum number of timeslots
    #[serde(default = "default_max_tslots")]
    pub max_tslots: u64,

    /// Maximum optimizer iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_hilbert_dim: default_max_hilbert_dim(),
            max_tslots: default_max_tslots(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_num_tslots() -> usize {
    10
}

fn default_evo_time() -> f64 {
    10.0
}

fn default_fid_err_targ() -> f64 {
    1e-10
}

fn default_max_iter() -> u64 {
    200
}

fn default_max_wall_time() -> f64 {
    120.0
}

fn default_min_grad() -> f64 {
    1e-20
}

fn default_lbfgs_memory() -> usize {
    10
}

fn default_pulse_scaling() -> f64 {
    1.0
}

fn default_output_dir() -> String {
    ".".into()
}

fn default_file_ext() -> String {
    "hadamard_n_ts10.txt".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

fn default_max_hilbert_dim() -> u64 {
    64
}

fn default_max_tslots() -> u64 {
    10_000
}

fn default_max_iterations() -> u64 {
    10_000
}
