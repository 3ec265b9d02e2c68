// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! PulseCtrl command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ndarray::Array2;
use num_complex::Complex64;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pulse_ctrl::config::Config;
use pulse_ctrl::dynamics::ControlProblem;
use pulse_ctrl::error::Result;
use pulse_ctrl::operators::{hadamard, sigma_x, sigma_y, sigma_z};
use pulse_ctrl::optim::PulseOptimizer;
use pulse_ctrl::output;
use pulse_ctrl::pulsegen::PulseType;

#[derive(Parser)]
#[command(name = "pulse-ctrl")]
#[command(version = pulse_ctrl::VERSION)]
#[command(about = "Optimal control pulse synthesis for quantum gates")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "PULSECTRL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a pulse optimization for a single-qubit gate
    Optimize {
        /// Target gate
        #[arg(long, value_enum, default_value_t = TargetGate::Hadamard)]
        target: TargetGate,

        /// Number of timeslots
        #[arg(long)]
        tslots: Option<usize>,

        /// Total evolution time
        #[arg(long)]
        evo_time: Option<f64>,

        /// Fidelity error target
        #[arg(long)]
        fid_err_targ: Option<f64>,

        /// Maximum optimizer iterations
        #[arg(long)]
        max_iter: Option<u64>,

        /// Maximum wall time in seconds
        #[arg(long)]
        max_wall_time: Option<f64>,

        /// Minimum gradient norm
        #[arg(long)]
        min_grad: Option<f64>,

        /// Initial pulse shape (RND, ZERO, LIN, SINE, SQUARE, SAW)
        #[arg(long)]
        init_pulse: Option<PulseType>,

        /// RNG seed for random initial pulses
        #[arg(long)]
        seed: Option<u64>,

        /// Suffix for amplitude file names
        #[arg(long)]
        out_ext: Option<String>,

        /// Output directory
        #[arg(long)]
        out_dir: Option<String>,

        /// Write initial/final amplitude files
        #[arg(long)]
        write_amps: bool,

        /// Render the pulse plot
        #[arg(long)]
        plot: bool,

        /// Write the JSON result summary to the output directory
        #[arg(long)]
        json_summary: bool,

        /// Write a JSON summary to this explicit path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,

    /// Validate the configuration and exit
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetGate {
    Hadamard,
    X,
    Y,
    Z,
}

impl TargetGate {
    fn matrix(self) -> Array2<Complex64> {
        match self {
            TargetGate::Hadamard => hadamard(),
            TargetGate::X => sigma_x(),
            TargetGate::Y => sigma_y(),
            TargetGate::Z => sigma_z(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            TargetGate::Hadamard => "hadamard",
            TargetGate::X => "x",
            TargetGate::Y => "y",
            TargetGate::Z => "z",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config.logging.level, &config.logging.format);

    if let Err(e) = run(cli.command, config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn run(command: Command, mut config: Config) -> Result<()> {
    match command {
        Command::Optimize {
            target,
            tslots,
            evo_time,
            fid_err_targ,
            max_iter,
            max_wall_time,
            min_grad,
            init_pulse,
            seed,
            out_ext,
            out_dir,
            write_amps,
            plot,
            json_summary,
            json,
        } => {
            if let Some(n) = tslots {
                config.optim.num_tslots = n;
            }
            if let Some(t) = evo_time {
                config.optim.evo_time = t;
            }
            if let Some(targ) = fid_err_targ {
                config.optim.fid_err_targ = targ;
            }
            if let Some(iters) = max_iter {
                config.optim.max_iter = iters;
            }
            if let Some(secs) = max_wall_time {
                config.optim.max_wall_time_s = secs;
            }
            if let Some(g) = min_grad {
                config.optim.min_grad = g;
            }
            if let Some(shape) = init_pulse {
                config.optim.init_pulse.pulse_type = shape;
            }
            if let Some(s) = seed {
                config.optim.init_pulse.seed = Some(s);
            }
            if let Some(ext) = out_ext {
                config.output.file_ext = ext;
            }
            if let Some(dir) = out_dir {
                config.output.directory = dir;
            }
            config.output.write_amps |= write_amps;
            config.output.plot |= plot;
            config.output.json_summary |= json_summary;
            config.validate()?;

            run_optimize(target, &config, json.as_deref())
        }
        Command::Config => {
            config.validate()?;
            let yaml = serde_yaml::to_string(&config)?;
            println!("{}", yaml);
            Ok(())
        }
        Command::Validate => {
            config.validate()?;
            println!("Configuration is valid");
            Ok(())
        }
    }
}

fn run_optimize(target: TargetGate, config: &Config, json: Option<&std::path::Path>) -> Result<()> {
    // Single qubit with sigma_z drift driven along sigma_x, the
    // demonstration setup.
    let problem = ControlProblem::unitary_synthesis(
        sigma_z(),
        vec![sigma_x()],
        target.matrix(),
        config.optim.num_tslots,
        config.optim.evo_time,
    );

    let optimizer = PulseOptimizer::with_limits(config.optim.clone(), config.limits.clone())?;
    let result = optimizer.optimize(&problem)?;

    println!("Target gate: {}", target.label());
    println!("Termination: {}", result.termination);
    println!("Number of iterations: {}", result.num_iter);
    println!("Final fidelity error: {:.6e}", result.fid_err);
    println!("Final gradient normal: {:.6e}", result.grad_norm_final);
    println!(
        "Completed in {:.6}s",
        result.stats.wall_time.as_secs_f64()
    );
    println!("Final evolution:");
    for row in result.evo_final.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|c| format!("{:+.6}{:+.6}i", c.re, c.im))
            .collect();
        println!("  [{}]", cells.join(", "));
    }
    println!("{}", result.stats.report());

    let out_dir = std::path::Path::new(&config.output.directory);
    if config.output.write_amps {
        let times = problem.slot_times();
        output::write_result_amps(out_dir, &config.output.file_ext, &times, &result)?;
    }
    if config.output.plot {
        std::fs::create_dir_all(out_dir)?;
        let plot_path = out_dir.join(format!("pulse_{}.png", target.label()));
        output::plot_amps(
            &plot_path,
            problem.evo_time,
            &result.initial_amps,
            &result.final_amps,
        )?;
    }
    if config.output.json_summary {
        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(output::summary_file_name(&config.output.file_ext));
        output::write_json_summary(&path, &result)?;
    }
    if let Some(path) = json {
        output::write_json_summary(path, &result)?;
    }

    Ok(())
}
