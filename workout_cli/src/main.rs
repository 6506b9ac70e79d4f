use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use workout_core::*;

#[derive(Parser)]
#[command(name = "workout")]
#[command(about = "Decode generated workout plans into a typed tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the fuzzy tag threshold (0-100)
    #[arg(long, global = true)]
    threshold: Option<u8>,

    /// Normalize decoded workouts before printing or comparing
    #[arg(long, global = true)]
    normalize: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a workout and print its step tree
    Decode {
        /// Input file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Report whether two workouts are structurally similar
    Compare {
        first: PathBuf,
        second: PathBuf,
    },
}

fn main() -> ExitCode {
    workout_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let decoder = match cli.threshold {
        Some(threshold) if threshold > 100 => {
            return Err(Error::Config(format!(
                "--threshold must be between 0 and 100, got {}",
                threshold
            )))
        }
        Some(threshold) => Decoder::with_threshold(threshold),
        None => Decoder::from_config(&config.decoder),
    };
    let normalize = cli.normalize || config.output.normalize;

    match cli.command {
        Commands::Decode { file } => cmd_decode(&decoder, file.as_deref(), normalize),
        Commands::Compare { first, second } => cmd_compare(&decoder, &first, &second, normalize),
    }
}

fn cmd_decode(decoder: &Decoder, file: Option<&Path>, normalize: bool) -> Result<ExitCode> {
    let text = read_input(file)?;
    let workout = decoder.decode(&text)?;
    tracing::debug!("Decoded workout with {} steps", workout.total_steps());

    if normalize {
        print!("{}", workout.compressed());
    } else {
        print!("{}", workout);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_compare(decoder: &Decoder, first: &Path, second: &Path, normalize: bool) -> Result<ExitCode> {
    let a = decoder.decode(&read_input(Some(first))?)?;
    let b = decoder.decode(&read_input(Some(second))?)?;

    let similar = if normalize {
        a.compressed().similar(&b.compressed())
    } else {
        a.similar(&b)
    };

    if similar {
        println!("similar");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("different");
        Ok(ExitCode::from(1))
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
