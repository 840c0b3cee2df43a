use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ringcheck::config::Config;
use ringcheck::report;
use ringcheck::RingBufError;
use ringcheck::stress::{self, CaseOptions, RandomOptions, StressReport};
use std::io;

#[derive(Parser, Debug)]
#[command(name = "ringcheck", about = "Stress-test a ring buffer against a list model", version)]
struct Cli {
    /// Buffer capacity (overrides config)
    #[arg(short, long)]
    size: Option<usize>,

    /// Sweep insertions 0..N (default: 3 × size)
    #[arg(short = 'n', long)]
    max_inserts: Option<usize>,

    /// Corrupt the reference model now and then to prove mismatches are caught
    #[arg(long)]
    metatest: bool,

    /// Run seeded random put/insert sequences instead of the exhaustive sweep
    #[arg(long)]
    random: bool,

    /// Random mode: number of buffers to exercise
    #[arg(long)]
    rounds: Option<usize>,

    /// Random mode: operations per buffer
    #[arg(long)]
    ops: Option<usize>,

    /// RNG seed (else RINGCHECK_SEED, else random)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log every case (same as RUST_LOG=debug)
    #[arg(short, long)]
    debug: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    print_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "ringcheck", &mut io::stdout());
        return Ok(());
    }

    let cfg = Config::load();
    if cli.print_config {
        return run_print_config(&cfg);
    }

    let size = cli.size.unwrap_or(cfg.sweep.size);
    if size == 0 {
        return Err(RingBufError::InvalidCapacity(size).into());
    }
    let seed = stress::resolve_seed(cli.seed);

    let result = if cli.random {
        let opts = RandomOptions {
            rounds:        cli.rounds.unwrap_or(cfg.random.rounds),
            ops_per_round: cli.ops.unwrap_or(cfg.random.ops_per_round),
            bad_depth_pct: cfg.random.bad_depth_pct.min(100),
        };
        stress::random_ops(size, &opts, seed)?
    } else {
        let max_inserts = cli.max_inserts.unwrap_or_else(|| {
            let sweep = ringcheck::config::SweepConfig { size, ..cfg.sweep.clone() };
            sweep.effective_max_inserts()
        });
        let metatest = cli.metatest || cfg.metatest.enabled;
        let opts = CaseOptions { metatest: metatest.then_some(cfg.metatest.one_in) };
        stress::sweep(size, max_inserts, &opts, seed)?
    };

    print_report(&result, cli.json)?;
    if !result.ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(result: &StressReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report::render_json(result))?);
    } else {
        print!("{}", report::render_text(result));
    }
    Ok(())
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[sweep]");
    println!("  size          = {}", cfg.sweep.size);
    println!("  max_inserts   = {} (effective {})", cfg.sweep.max_inserts, cfg.sweep.effective_max_inserts());
    println!();
    println!("[metatest]");
    println!("  enabled       = {}", cfg.metatest.enabled);
    println!("  one_in        = {}", cfg.metatest.one_in);
    println!();
    println!("[random]");
    println!("  rounds        = {}", cfg.random.rounds);
    println!("  ops_per_round = {}", cfg.random.ops_per_round);
    println!("  bad_depth_pct = {}%", cfg.random.bad_depth_pct);
    Ok(())
}
