//! Command-line probe for the implementors registry.
//!
//! # Responsibility
//! - Replay a generated docs tree's implementor fragments into a registry.
//! - Attach the consumer before, after, or midway through the replay and
//!   print what the consumer ended up with.

use clap::{Parser, ValueEnum};
use implreg_core::{
    discover_fragments, implementors_root, init_logging, parse_pending_policy, replay_into,
    Contribution, ImplementorsConsumer, MergedImplementors, PendingPolicy, RecordingConsumer,
    RegistryConfig, SharedConsumer,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "implreg", version, about = "Replay rustdoc implementor fragments into a registry")]
struct Cli {
    /// Docs output directory, or its `implementors/` subdirectory.
    docs_dir: PathBuf,

    /// When the consumer attaches relative to fragment loading.
    #[arg(long, value_enum, default_value_t = Attach::After)]
    attach: Attach,

    /// Pending policy: `single-slot` or `buffered`.
    #[arg(long, value_parser = parse_pending_policy)]
    policy: Option<PendingPolicy>,

    /// JSON config file with `pending_policy` and `log_level`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the entries of one library instead of the summary.
    #[arg(long)]
    library: Option<String>,

    /// Print every delivery the consumer received.
    #[arg(long)]
    trace: bool,

    #[arg(long)]
    log_level: Option<String>,

    /// Enables file logging into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Attach {
    Before,
    Midway,
    After,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("implreg: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => RegistryConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => RegistryConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.pending_policy = policy;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::path::absolute(log_dir)?;
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let files = discover_fragments(&implementors_root(&cli.docs_dir))?;
    let split = match cli.attach {
        Attach::Before => 0,
        Attach::Midway => files.len() / 2,
        Attach::After => files.len(),
    };
    let (early, late) = files.split_at(split);

    let merged = SharedConsumer::new(MergedImplementors::new());
    let recorder = SharedConsumer::new(RecordingConsumer::new());
    let mut merged_sink = merged.clone();
    let mut recorder_sink = recorder.clone();

    let mut registry = config.build_registry();
    let mut report = replay_into(&mut registry, early);
    registry.install_consumer(move |contribution: Contribution| {
        recorder_sink.accept(contribution.clone());
        merged_sink.accept(contribution);
    });
    report.absorb(replay_into(&mut registry, late));
    info!(
        "event=cli_replay module=cli attach={:?} policy={} fragments={}",
        cli.attach,
        config.pending_policy.as_str(),
        files.len()
    );

    for failure in &report.failures {
        eprintln!("warning: {failure}");
    }

    if cli.trace {
        recorder.read(|recorder| {
            for (index, delivery) in recorder.deliveries().iter().enumerate() {
                println!(
                    "delivery {index}: libraries={} entries={}",
                    delivery.len(),
                    delivery.entry_count()
                );
            }
        });
    }

    merged.read(|view| print_view(view, cli.library.as_deref()))?;
    println!(
        "registered={} failed={} delivered={} policy={}",
        report.registered.len(),
        report.failures.len(),
        merged.read(MergedImplementors::contributions_seen),
        config.pending_policy.as_str()
    );
    Ok(())
}

fn print_view(view: &MergedImplementors, library: Option<&str>) -> Result<(), String> {
    match library {
        Some(library) => {
            let entries = view
                .get(library)
                .ok_or_else(|| format!("library not registered: {library}"))?;
            for entry in entries {
                println!("{}", entry.markup().unwrap_or("<opaque entry>"));
            }
        }
        None => {
            for library in view.libraries() {
                let count = view.get(library.as_str()).map_or(0, <[_]>::len);
                println!("{library}\t{count}");
            }
        }
    }
    Ok(())
}
