use std::time::Duration;

use arena::metrics::{cells_owned, occupancy};
use arena::render::render_core;
use arena::{Engine, EngineConfig, Outcome, Placement, ProgramId, warriors};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arena", about = "Redcode arena: programs battling in a shared circular core")]
struct Cli {
    /// Random seed for program placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of cells in the core.
    #[arg(long, default_value_t = 200)]
    core_size: usize,

    /// Built-in programs to load, in turn order (imp, dwarf).
    #[arg(long, value_delimiter = ',', default_value = "imp,dwarf")]
    programs: Vec<String>,

    /// Stop after this many instructions if no winner has emerged.
    #[arg(long, default_value_t = 10_000)]
    max_steps: u64,

    /// Print the ownership map after every step.
    #[arg(long)]
    show: bool,

    /// Cells per row when printing the ownership map.
    #[arg(long, default_value_t = 20)]
    width: usize,

    /// Use ANSI background colours for owned cells.
    #[arg(long)]
    color: bool,

    /// Pause between printed steps, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Skip collision checks past the end of the core when placing programs.
    #[arg(long)]
    unwrapped_placement: bool,

    /// Treat SPL as a no-op.
    #[arg(long)]
    no_split: bool,

    /// Print a listing of every claimed cell when the game ends.
    #[arg(long)]
    disassemble: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Program ids follow load order; more programs than ids is an error.
fn program_id(index: usize) -> Result<ProgramId, std::num::TryFromIntError> {
    ProgramId::try_from(index)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        core_size: cli.core_size,
        placement: if cli.unwrapped_placement {
            Placement::Unwrapped
        } else {
            Placement::Wrapping
        },
        split_processes: !cli.no_split,
        ..Default::default()
    };
    let mut engine = Engine::new(config, cli.seed)?;

    for (id, name) in cli.programs.iter().enumerate() {
        let code = warriors::by_name(name).ok_or_else(|| {
            format!(
                "Unknown program: {name}. Available: {}",
                warriors::NAMES.join(", ")
            )
        })?;
        let start = engine.spawn(program_id(id)?, 0, &code)?;
        eprintln!("program #{id} ({name}) loaded at {start}");
    }
    engine.start()?;

    let delay = Duration::from_millis(cli.delay_ms);
    if cli.show {
        println!("{}", render_core(engine.core().cells(), cli.width, cli.color));
    }
    for _ in 0..cli.max_steps {
        let running = engine.step();
        if cli.show {
            println!("{}", render_core(engine.core().cells(), cli.width, cli.color));
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
        if !running {
            break;
        }
    }

    match engine.outcome() {
        Outcome::Winner(id) => println!("winner: program #{id} after {} steps", engine.steps()),
        Outcome::Draw => println!("draw: no survivors after {} steps", engine.steps()),
        Outcome::Running => println!(
            "no winner after {} steps; alive: {:?}",
            engine.steps(),
            engine.alive_programs()
        ),
    }
    println!("  core occupancy: {:.1}%", occupancy(engine.core().cells()) * 100.0);
    for (id, cells) in cells_owned(engine.core().cells()) {
        println!("  program #{id}: {cells} cells");
    }
    for record in engine.faults() {
        println!("  step {}: program #{} {}", record.step, record.program, record.fault);
    }
    if cli.disassemble {
        print!("{}", engine.core().disassemble());
    }
    Ok(())
}
