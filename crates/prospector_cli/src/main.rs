use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prospector_control::Suite;
use prospector_core::EngineConfig;
use std::path::PathBuf;

mod episodes;
mod harness;
mod parity;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// With no subcommand, `--seed --actions --out` records a trace directly.
#[derive(Parser)]
#[command(
    name = "prospector_cli",
    about = "Asteroid prospector trace harness",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    trace: BareTraceArgs,
}

#[derive(clap::Args)]
struct BareTraceArgs {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    actions: Option<PathBuf>,
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    config: ConfigArgs,
}

impl BareTraceArgs {
    fn run(self) -> Result<()> {
        let seed = self.seed.context("--seed is required")?;
        let actions = self.actions.context("--actions is required")?;
        let out = self.out.context("--out is required")?;
        harness::trace(self.config.config(), seed, &actions, &out)
    }
}

#[derive(clap::Args, Clone, Copy)]
struct ConfigArgs {
    /// Episode time budget in ticks. Non-positive values fall back to the default.
    #[arg(long, default_value_t = EngineConfig::default().time_max)]
    time_max: f32,
    /// Reward penalty per invalid action. Non-positive values fall back to the default.
    #[arg(long, default_value_t = EngineConfig::default().invalid_action_penalty)]
    invalid_action_penalty: f32,
}

impl ConfigArgs {
    fn config(self) -> EngineConfig {
        EngineConfig {
            time_max: self.time_max,
            invalid_action_penalty: self.invalid_action_penalty,
        }
    }
}

/// Action suites by their parity-run letters.
#[derive(Clone, Copy, ValueEnum)]
enum SuiteArg {
    /// Uniform random codes, including out-of-range ones.
    A,
    /// Station trading, mining and invalid-code mix.
    B,
    /// Scan, select, mine, travel and sell cycle.
    C,
    /// Rule-based prospecting policy.
    Autopilot,
}

impl From<SuiteArg> for Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::A => Suite::Random,
            SuiteArg::B => Suite::StationMix,
            SuiteArg::C => Suite::FieldCycle,
            SuiteArg::Autopilot => Suite::Autopilot,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a one-byte-per-action file and write a packed binary trace.
    Trace {
        #[arg(long)]
        seed: u64,
        #[arg(long)]
        actions: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Generate an action file from one of the named suites.
    Actions {
        #[arg(long, value_enum)]
        suite: SuiteArg,
        #[arg(long)]
        steps: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Compare two trace files and report the first divergence.
    Compare {
        #[arg(long)]
        expected: PathBuf,
        #[arg(long)]
        actual: PathBuf,
        #[arg(long, default_value_t = 1e-6)]
        atol: f32,
        #[arg(long, default_value_t = 1e-5)]
        rtol: f32,
    },
    /// Drive an engine with a suite's actions and print episode summaries.
    Run {
        #[arg(long)]
        seed: u64,
        #[arg(long)]
        steps: u64,
        #[arg(long, value_enum, default_value = "a")]
        suite: SuiteArg,
        #[arg(long, default_value_t = 500)]
        print_every: u64,
        /// Print episode summaries as JSON lines.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    dispatch(Cli::parse())
}

fn dispatch(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        return cli.trace.run();
    };
    match command {
        Commands::Trace {
            seed,
            actions,
            out,
            config,
        } => harness::trace(config.config(), seed, &actions, &out)?,
        Commands::Actions {
            suite,
            steps,
            seed,
            out,
            config,
        } => harness::write_actions(config.config(), suite.into(), seed, steps, &out)?,
        Commands::Compare {
            expected,
            actual,
            atol,
            rtol,
        } => {
            if atol < 0.0 || rtol < 0.0 {
                bail!("tolerances must be non-negative (atol={atol}, rtol={rtol})");
            }
            parity::compare(&expected, &actual, parity::Tolerance { atol, rtol })?;
        }
        Commands::Run {
            seed,
            steps,
            suite,
            print_every,
            json,
            config,
        } => {
            episodes::run(
                config.config(),
                episodes::RunOptions {
                    seed,
                    steps,
                    suite: suite.into(),
                    print_every,
                    json,
                },
            )?;
        }
    }
    Ok(())
}
