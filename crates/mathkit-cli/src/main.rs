//! MathKit CLI
//!
//! Drives the MathKit engines from the command line, one widget per
//! subcommand.

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use mathkit_core::{
    Catalog, Config, CurveKind, DerivativeView, Equation, Fraction, FractionField, Machine,
    MathKitError, MoveKind, Molecule, NumberLine, Prompt, SampleRange, Tier, Workspace,
};
use mathkit_report::{json::JsonGenerator, MarkdownGenerator, SessionReport};
use mathkit_tutor::TutorClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Whole size used when a fraction argument leaves it out.
const DEFAULT_WHOLE: &str = "100";

/// Largest step between two points on the number line, in either direction.
const MOVE_RANGE: std::ops::RangeInclusive<i64> = -20..=20;

/// MathKit - interactive math and science engines
#[derive(Parser, Debug)]
#[command(name = "mathkit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: mathkit.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push a value through a pipeline of operations
    Machine {
        /// Input value (default: machineInput from config)
        #[arg(short, long, allow_negative_numbers = true)]
        input: Option<f64>,

        /// Operation to append; repeat to build a pipeline
        #[arg(long = "op", value_name = "ID")]
        ops: Vec<String>,

        /// Remove the operation at this index after building the pipeline
        #[arg(long, value_name = "INDEX")]
        remove: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Build a number with base-ten blocks
    Blocks {
        /// Add one block to a tier; repeatable
        #[arg(long, value_name = "TIER")]
        add: Vec<Tier>,

        /// Remove one block from a tier; repeatable
        #[arg(long, value_name = "TIER")]
        remove: Vec<Tier>,

        /// Carry every full group of ten into the next tier
        #[arg(long)]
        regroup: bool,

        /// Number to build (default: placeValueTarget from config)
        #[arg(long)]
        target: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Play one round of the number line game
    NumberLine {
        /// Starting position
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        position: i32,

        /// Ask to add this value instead of a random prompt
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "subtract",
            value_parser = clap::value_parser!(i32).range(MOVE_RANGE)
        )]
        add: Option<i32>,

        /// Ask to subtract this value instead of a random prompt
        #[arg(
            long,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i32).range(MOVE_RANGE)
        )]
        subtract: Option<i32>,

        /// Seed for the random prompt
        #[arg(long)]
        seed: Option<u64>,

        /// Position to move the marker to
        #[arg(long, allow_negative_numbers = true)]
        move_to: Option<i32>,

        /// Ask the tutor to explain the result
        #[arg(long)]
        feedback: bool,
    },

    /// Compare a secant slope with the derivative
    Derivative {
        /// quadratic, cubic or sine
        #[arg(long, default_value = "quadratic")]
        curve: String,

        /// Point of tangency
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,

        /// Secant width
        #[arg(long, default_value_t = 1.0)]
        dx: f64,

        /// Print the sampled curve
        #[arg(long)]
        samples: bool,
    },

    /// Check coefficients for 2H2 + O2 -> 2H2O
    Balance {
        /// Coefficient of H2
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        h2: String,

        /// Coefficient of O2
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        o2: String,

        /// Coefficient of H2O
        #[arg(long, default_value = "2", allow_hyphen_values = true)]
        h2o: String,
    },

    /// Compare two fractions of a whole, written n/d@whole
    Fraction {
        /// First fraction
        first: String,

        /// Second fraction
        second: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Machine {
            input,
            ops,
            remove,
            format,
        } => run_machine(&config, input, ops, remove, format),
        Command::Blocks {
            add,
            remove,
            regroup,
            target,
            format,
        } => run_blocks(&config, &add, &remove, regroup, target, format),
        Command::NumberLine {
            position,
            add,
            subtract,
            seed,
            move_to,
            feedback,
        } => {
            let prompt = match (add, subtract) {
                (Some(value), _) => Some(Prompt {
                    operation: MoveKind::Add,
                    value,
                }),
                (None, Some(value)) => Some(Prompt {
                    operation: MoveKind::Subtract,
                    value,
                }),
                (None, None) => None,
            };
            run_number_line(&config, position, prompt, seed, move_to, feedback).await
        }
        Command::Derivative {
            curve,
            x,
            dx,
            samples,
        } => {
            run_derivative(&config, &curve, x, dx, samples);
            Ok(())
        }
        Command::Balance { h2, o2, h2o } => {
            run_balance(&h2, &o2, &h2o);
            Ok(())
        }
        Command::Fraction { first, second } => {
            run_fraction(&first, &second);
            Ok(())
        }
    }
}

/// Loads configuration from file or uses defaults.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_machine(
    config: &Config,
    input: Option<f64>,
    ops: Vec<String>,
    remove: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalog = Catalog::standard();
    for id in ops.iter().filter(|id| catalog.get(id).is_none()) {
        tracing::warn!(operation = %id, "Unknown operation will be skipped");
    }

    let mut machine = ops
        .into_iter()
        .fold(Machine::new(config.machine_input), Machine::add_operation);
    if let Some(input) = input {
        machine = machine.set_input(input);
    }
    if let Some(index) = remove {
        machine = machine.remove_operation(index)?;
    }
    let machine = machine.run_and_record(&catalog);

    match format {
        OutputFormat::Text => {
            let Some(run) = machine.history.last() else {
                return Ok(());
            };
            println!("Input: {}", run.input);
            for step in run.steps.iter().skip(1) {
                println!("{}: {}", step.operation, step.value);
            }
            println!("Output: {}", run.result);
        }
        OutputFormat::Markdown | OutputFormat::Json => {
            let report = SessionReport::builder()
                .title("function machine")
                .machine(&machine, &catalog)
                .build();
            print_report(&report, format)?;
        }
    }
    Ok(())
}

fn run_blocks(
    config: &Config,
    add: &[Tier],
    remove: &[Tier],
    regroup: bool,
    target: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let workspace = Workspace::new(target.unwrap_or(config.place_value_target));
    let workspace = add.iter().fold(workspace, |ws, &tier| ws.add_block(tier));
    let workspace = remove
        .iter()
        .fold(workspace, |ws, &tier| ws.remove_block(tier));
    let workspace = if regroup {
        workspace.regroup()
    } else {
        workspace
    };

    match format {
        OutputFormat::Text => {
            for tier in Tier::ALL.iter().rev() {
                println!("{:>9}: {}", tier.label(), workspace.count(*tier));
            }
            println!(
                "Total: {} (target {})",
                workspace.total_value(),
                workspace.target()
            );
            println!("{}", workspace.comparison().feedback());
        }
        OutputFormat::Markdown | OutputFormat::Json => {
            let report = SessionReport::builder()
                .title("base-ten blocks")
                .blocks(&workspace)
                .build();
            print_report(&report, format)?;
        }
    }
    Ok(())
}

async fn run_number_line(
    config: &Config,
    position: i32,
    prompt: Option<Prompt>,
    seed: Option<u64>,
    move_to: Option<i32>,
    feedback: bool,
) -> anyhow::Result<()> {
    let line = NumberLine::starting_at(position)?;
    let line = match prompt {
        Some(prompt) => NumberLine { prompt, ..line },
        None => {
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            line.next_prompt(&mut rng)
        }
    };

    println!("Position: {}", line.position);
    println!("{}", line.prompt.instruction());

    let Some(target) = move_to else {
        return Ok(());
    };
    let (line, outcome) = match line.attempt_move(target) {
        Ok(graded) => graded,
        Err(e @ MathKitError::OutOfBounds { .. }) => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Moved to: {}", line.position);
    if outcome.is_correct() {
        println!("Correct!");
    } else {
        println!("Not quite. The answer was {}.", outcome.expected);
    }

    if feedback {
        let client = TutorClient::new(&config.tutor)?;
        println!();
        println!("{}", client.feedback(&outcome.tutor_prompt()).await);
    }
    Ok(())
}

fn run_derivative(config: &Config, curve: &str, x: f64, dx: f64, samples: bool) {
    let view = DerivativeView::default()
        .with_curve(CurveKind::from_name(curve))
        .with_point(x)
        .with_delta(dx);
    let secant = view.secant();

    println!("{}", view.curve);
    println!("x = {:.2}, dx = {:.2}", view.point_x(), view.delta_x());
    println!("Secant slope: {:.4}", secant.slope);
    println!("Derivative:   {:.4}", view.derivative());

    if samples {
        println!();
        for point in view.samples(SampleRange::from(config.derivative)) {
            println!("{:>6.2}\t{:>8.4}", point.x, point.y);
        }
    }
}

fn run_balance(h2: &str, o2: &str, h2o: &str) {
    let equation = Equation::from_fields(h2, o2, h2o);
    println!("{equation}");
    println!("Reactants: {}", equation.left());
    println!("Products:  {}", equation.right());
    if equation.is_balanced() {
        println!("Balanced!");
    } else {
        println!(
            "Not balanced yet. Adjust the {} coefficients.",
            [Molecule::H2, Molecule::O2, Molecule::H2O]
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn run_fraction(first: &str, second: &str) {
    let [default_first, default_second] = Fraction::starting_pair();
    let first = parse_fraction(default_first, first);
    let second = parse_fraction(default_second, second);

    for fraction in [&first, &second] {
        println!(
            "{:<14} {} = {:.2}",
            fraction.to_string(),
            fraction_bar(fraction),
            fraction.actual_value()
        );
    }
    println!("{}", mathkit_core::compare_fractions(&first, &second).message());
}

// ============================================================================
// Helpers
// ============================================================================

fn print_report(report: &SessionReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", JsonGenerator::new(report).generate_pretty()?),
        _ => print!("{}", MarkdownGenerator::new(report).generate()),
    }
    Ok(())
}

/// Parses `n/d@whole`, with the same fallbacks as editing the fields by hand.
fn parse_fraction(start: Fraction, text: &str) -> Fraction {
    let (part, whole) = text.split_once('@').unwrap_or((text, DEFAULT_WHOLE));
    let (numerator, denominator) = part.split_once('/').unwrap_or((part, "1"));
    start
        .update(FractionField::Numerator, numerator)
        .update(FractionField::Denominator, denominator)
        .update(FractionField::WholeSize, whole)
}

fn fraction_bar(fraction: &Fraction) -> String {
    let cells: String = fraction
        .segments()
        .iter()
        .map(|s| if s.filled { '#' } else { '.' })
        .collect();
    format!("[{cells}]")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fraction_full() {
        let [start, _] = Fraction::starting_pair();
        assert_eq!(parse_fraction(start, "3/8@120"), Fraction::new(3, 8, 120));
    }

    #[test]
    fn test_parse_fraction_defaults_whole() {
        let [start, _] = Fraction::starting_pair();
        assert_eq!(parse_fraction(start, "2/3"), Fraction::new(2, 3, 100));
    }

    #[test]
    fn test_parse_fraction_sanitizes_fields() {
        let [start, _] = Fraction::starting_pair();
        assert_eq!(parse_fraction(start, "0/99@1000"), Fraction::new(1, 12, 200));
        assert_eq!(parse_fraction(start, "x/y@z"), Fraction::new(1, 1, 50));
    }

    #[test]
    fn test_fraction_bar() {
        assert_eq!(fraction_bar(&Fraction::new(1, 4, 100)), "[#...]");
        assert_eq!(fraction_bar(&Fraction::new(3, 3, 75)), "[###]");
    }

    #[test]
    fn test_args_parse_machine() {
        let args = Args::parse_from([
            "mathkit", "machine", "--input", "-2", "--op", "double", "--op", "add2",
        ]);
        match args.command {
            Command::Machine { input, ops, .. } => {
                assert_eq!(input, Some(-2.0));
                assert_eq!(ops, vec!["double", "add2"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_parse_blocks_tiers() {
        let args = Args::parse_from([
            "mathkit", "blocks", "--add", "Ones", "--add", "tens", "--regroup",
        ]);
        match args.command {
            Command::Blocks { add, regroup, .. } => {
                assert_eq!(add, vec![Tier::Ones, Tier::Tens]);
                assert!(regroup);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_limit_number_line_steps() {
        let args = Args::parse_from(["mathkit", "number-line", "--position", "10", "--add", "-20"]);
        match args.command {
            Command::NumberLine { add, .. } => assert_eq!(add, Some(-20)),
            other => panic!("unexpected command: {other:?}"),
        }

        for flag in ["--add", "--subtract"] {
            assert!(Args::try_parse_from([
                "mathkit",
                "number-line",
                "--position",
                "10",
                flag,
                "2147483647",
                "--move-to",
                "0",
            ])
            .is_err());
        }
    }

    #[test]
    fn test_args_reject_unknown_tier() {
        assert!(Args::try_parse_from(["mathkit", "blocks", "--add", "millions"]).is_err());
    }
}
