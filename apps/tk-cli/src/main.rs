mod batch;
mod config;
mod error;
mod report;
mod request;

use clap::{ArgGroup, Parser, Subcommand};
use config::{EngineConfig, OutputFormat, ProviderKind};
use error::{CliError, CliResult};
use request::{Context, Request};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "tk-cli")]
#[command(about = "ThermoKit CLI - cycle and phase equilibrium calculator", long_about = None)]
struct Cli {
    /// YAML configuration file (defaults to $TK_CONFIG when set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Property provider, overriding the configuration
    #[arg(long, global = true, value_enum)]
    provider: Option<ProviderKind>,
    /// Output format, overriding the configuration
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an ideal Rankine cycle
    Rankine {
        /// Boiler pressure [Pa]
        #[arg(long)]
        p_boiler: f64,
        /// Turbine inlet temperature [K]
        #[arg(long)]
        t_boiler: f64,
        /// Condenser pressure [Pa]
        #[arg(long)]
        p_condenser: f64,
        #[arg(long, default_value_t = 0.85)]
        eta_pump: f64,
        #[arg(long, default_value_t = 0.85)]
        eta_turbine: f64,
    },
    /// Solve an air-standard Brayton cycle
    Brayton {
        /// Compressor inlet pressure [Pa]
        #[arg(long)]
        p1: f64,
        /// Compressor inlet temperature [K]
        #[arg(long)]
        t1: f64,
        /// Compressor outlet pressure [Pa]
        #[arg(long)]
        p2: f64,
        /// Turbine inlet temperature [K]
        #[arg(long)]
        t3: f64,
        #[arg(long, default_value_t = 0.85)]
        eta_compressor: f64,
        #[arg(long, default_value_t = 0.85)]
        eta_turbine: f64,
        /// Heat capacity ratio, overriding the configuration
        #[arg(long)]
        gamma: Option<f64>,
    },
    /// Bubble-point pressure and vapor composition of a binary mixture
    Vle {
        /// Temperature [K]
        #[arg(long)]
        temperature: f64,
        /// Saturation pressure of component 1 [Pa]
        #[arg(long)]
        psat1: f64,
        /// Saturation pressure of component 2 [Pa]
        #[arg(long)]
        psat2: f64,
        /// Liquid mole fraction of component 1
        #[arg(long)]
        x1: f64,
        /// Wilson parameters Λ12 Λ21 (ideal solution when omitted)
        #[arg(long, num_args = 2, value_names = ["L12", "L21"])]
        wilson: Option<Vec<f64>>,
        /// Points on the accompanying Pxy curve
        #[arg(long)]
        curve_points: Option<usize>,
    },
    /// Bubble and dew pressure curves at constant activity coefficients
    Pxy {
        #[arg(long)]
        psat1: f64,
        #[arg(long)]
        psat2: f64,
        #[arg(long, default_value_t = 1.0)]
        gamma1: f64,
        #[arg(long, default_value_t = 1.0)]
        gamma2: f64,
        #[arg(long)]
        points: Option<usize>,
    },
    /// Isothermal flash of a binary feed
    Flash {
        /// Feed mole fraction of component 1
        #[arg(long)]
        z1: f64,
        /// Flash pressure [Pa]
        #[arg(long)]
        pressure: f64,
        /// Flash temperature [K]
        #[arg(long)]
        temperature: f64,
        #[arg(long)]
        psat1: f64,
        #[arg(long)]
        psat2: f64,
        #[arg(long, num_args = 2, value_names = ["L12", "L21"])]
        wilson: Option<Vec<f64>>,
    },
    /// Bubble and dew temperature curves at fixed pressure
    Txy {
        /// Total pressure [Pa]
        #[arg(long)]
        pressure: f64,
        /// Antoine A B C of component 1: log10(Psat/Pa) = A - B/(T/K + C)
        #[arg(long, num_args = 3, value_names = ["A", "B", "C"], allow_negative_numbers = true)]
        antoine1: Vec<f64>,
        /// Antoine A B C of component 2
        #[arg(long, num_args = 3, value_names = ["A", "B", "C"], allow_negative_numbers = true)]
        antoine2: Vec<f64>,
        #[arg(long, num_args = 2, value_names = ["L12", "L21"])]
        wilson: Option<Vec<f64>>,
        /// Lower end of the bubble-temperature search [K]
        #[arg(long)]
        t_min: Option<f64>,
        /// Upper end of the bubble-temperature search [K]
        #[arg(long)]
        t_max: Option<f64>,
        #[arg(long)]
        points: Option<usize>,
    },
    /// Solve a vapor-compression refrigeration cycle
    Refrigeration {
        /// Evaporating temperature [K]
        #[arg(long)]
        t_evap: f64,
        /// Condensing temperature [K]
        #[arg(long)]
        t_cond: f64,
        #[arg(long, default_value = "R134a")]
        refrigerant: String,
    },
    /// Look up a water/steam state
    #[command(group(ArgGroup::new("second").required(true).args(["t", "x", "s", "h"])))]
    Steam {
        /// Pressure [Pa]
        #[arg(long)]
        p: f64,
        /// Temperature [K]
        #[arg(long)]
        t: Option<f64>,
        /// Vapor quality
        #[arg(long)]
        x: Option<f64>,
        /// Specific entropy [kJ/(kg·K)]
        #[arg(long)]
        s: Option<f64>,
        /// Specific enthalpy [kJ/kg]
        #[arg(long)]
        h: Option<f64>,
    },
    /// Evaluate a YAML or JSON list of requests in parallel
    Batch {
        /// Request file (`.json` for JSON, YAML otherwise)
        file: PathBuf,
    },
}

fn fixed_values<const N: usize>(flag: &str, values: Vec<f64>) -> CliResult<[f64; N]> {
    <[f64; N]>::try_from(values).map_err(|v| {
        CliError::InvalidArgument(format!(
            "--{flag} takes exactly {N} values, got {}",
            v.len()
        ))
    })
}

fn wilson_pair(values: Option<Vec<f64>>) -> CliResult<Option<[f64; 2]>> {
    values.map(|v| fixed_values("wilson", v)).transpose()
}

impl Commands {
    /// Single-calculation commands map onto a [`Request`]; `batch` does not.
    fn into_request(self) -> CliResult<Option<Request>> {
        Ok(Some(match self {
            Commands::Rankine {
                p_boiler,
                t_boiler,
                p_condenser,
                eta_pump,
                eta_turbine,
            } => Request::Rankine {
                p_boiler,
                t_boiler,
                p_condenser,
                eta_pump,
                eta_turbine,
            },
            Commands::Brayton {
                p1,
                t1,
                p2,
                t3,
                eta_compressor,
                eta_turbine,
                gamma,
            } => Request::Brayton {
                p1,
                t1,
                p2,
                t3,
                eta_compressor,
                eta_turbine,
                gamma,
            },
            Commands::Vle {
                temperature,
                psat1,
                psat2,
                x1,
                wilson,
                curve_points,
            } => Request::Vle {
                temperature,
                psat1,
                psat2,
                x1,
                wilson: wilson_pair(wilson)?,
                curve_points,
            },
            Commands::Pxy {
                psat1,
                psat2,
                gamma1,
                gamma2,
                points,
            } => Request::Pxy {
                psat1,
                psat2,
                gamma1,
                gamma2,
                points,
            },
            Commands::Flash {
                z1,
                pressure,
                temperature,
                psat1,
                psat2,
                wilson,
            } => Request::Flash {
                z1,
                pressure,
                temperature,
                psat1,
                psat2,
                wilson: wilson_pair(wilson)?,
            },
            Commands::Txy {
                pressure,
                antoine1,
                antoine2,
                wilson,
                t_min,
                t_max,
                points,
            } => Request::Txy {
                pressure,
                antoine1: fixed_values("antoine1", antoine1)?,
                antoine2: fixed_values("antoine2", antoine2)?,
                wilson: wilson_pair(wilson)?,
                t_min,
                t_max,
                points,
            },
            Commands::Refrigeration {
                t_evap,
                t_cond,
                refrigerant,
            } => Request::Refrigeration {
                t_evap,
                t_cond,
                refrigerant,
            },
            Commands::Steam { p, t, x, s, h } => Request::Steam { p, t, x, s, h },
            Commands::Batch { .. } => return Ok(None),
        }))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    let mut config = EngineConfig::resolve(cli.config.as_deref())?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    let ctx = Context::from_config(&config)?;

    match cli.command {
        Commands::Batch { file } => cmd_batch(&ctx, &file, config.format),
        command => match command.into_request()? {
            Some(request) => cmd_single(&ctx, &request, config.format),
            None => Ok(ExitCode::SUCCESS),
        },
    }
}

fn cmd_single(ctx: &Context, request: &Request, format: OutputFormat) -> CliResult<ExitCode> {
    tracing::debug!(kind = request.kind(), provider = ctx.provider_name(), "evaluating");
    let report = ctx.evaluate(request)?;
    print!("{}", report.render(format)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_batch(ctx: &Context, file: &Path, format: OutputFormat) -> CliResult<ExitCode> {
    let requests = batch::load_requests(file)?;
    let entries = batch::run_batch(ctx, &requests);
    print!("{}", batch::render_batch(&entries, format)?);

    if entries.iter().any(batch::BatchEntry::is_error) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
