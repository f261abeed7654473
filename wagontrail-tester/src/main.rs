mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wagontrail_game::{ConfigLoader, Difficulty, JourneyFactory};

use logic::{
    RunAggregate, RunRecord, SeedInfo, SimulationConfig, Strategy, aggregate_runs,
    resolve_seed_inputs, simulate,
};
use util::{FileConfigLoader, split_csv};

#[derive(Debug, Parser)]
#[command(name = "wagontrail-tester", version = "0.1.0")]
#[command(about = "Headless journey runner for the Wagon Trail engine")]
struct Args {
    /// Seeds to run (comma-separated numbers or share codes such as PI-PRAIRIE42)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Journeys per seed and strategy
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Difficulty for numeric seeds (settler, pioneer, trailblazer); share codes carry their own
    #[arg(long, default_value = "pioneer", value_parser = parse_difficulty)]
    difficulty: Difficulty,

    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON overlay for the engine's trail tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abandon a journey still on the trail after this many days
    #[arg(long, default_value_t = 365)]
    max_days: u32,

    /// Pause between engine ticks, for watching a run unfold
    #[arg(long, default_value_t = 0)]
    tick_delay_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::parse(value)
        .ok_or_else(|| format!("unknown difficulty `{value}` (settler, pioneer, trailblazer)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    if args.report == "console" || args.output.is_some() {
        announce_banner();
    }

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies)?;
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let factory = JourneyFactory::new(FileConfigLoader::new(args.config.clone()));
    factory
        .trail_config()
        .context("trail config overlay rejected")?;

    let records = run_journeys(&args, &factory, &strategies, &seed_infos)?;
    let aggregates = aggregate_runs(&records);
    write_reports(&args, &records, &aggregates, start_time)
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🐂 Wagon Trail Journey Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn expand_strategies(raw: &str) -> Result<Vec<Strategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            return Ok(Strategy::ALL.to_vec());
        }
        let Some(strategy) = Strategy::parse(&token) else {
            bail!("Unknown strategy: {token} (try --list-strategies)");
        };
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }
    if strategies.is_empty() {
        bail!("No strategies selected");
    }
    Ok(strategies)
}

fn run_journeys<L>(
    args: &Args,
    factory: &JourneyFactory<L>,
    strategies: &[Strategy],
    seed_infos: &[SeedInfo],
) -> Result<Vec<RunRecord>>
where
    L: ConfigLoader,
    L::Error: Into<anyhow::Error>,
{
    let iterations = args.iterations as usize;
    let mut records = Vec::with_capacity(strategies.len() * seed_infos.len() * iterations);

    for &strategy in strategies {
        for info in seed_infos {
            let difficulty = info.difficulty_or(args.difficulty);
            for iteration in 0..iterations {
                let seed = info.iteration_seed(iteration);
                let config = SimulationConfig::new(difficulty, strategy, seed)
                    .with_code(info.code_for(iteration, difficulty))
                    .with_max_days(args.max_days)
                    .with_tick_delay(Duration::from_millis(args.tick_delay_ms));
                let record = simulate(factory, config)
                    .with_context(|| format!("{strategy} run on seed {seed} failed"))?;
                if args.verbose {
                    let status = if record.is_victory() { "✅" } else { "❌" };
                    println!(
                        "{status} [{} seed {}] {} days: {}",
                        strategy.label().green(),
                        seed,
                        record.days,
                        record.headline
                    );
                }
                records.push(record);
            }
        }
    }

    Ok(records)
}

fn write_reports(
    args: &Args,
    records: &[RunRecord],
    aggregates: &[RunAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records, aggregates)?,
        "markdown" => {
            logic::reports::generate_markdown_report(&mut output_target, records, aggregates)?;
        }
        _ => {
            let duration = start_time.elapsed();
            if records.is_empty() {
                writeln!(&mut output_target, "No journeys executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    records,
                    aggregates,
                    duration,
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
