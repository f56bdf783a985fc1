use clap::{Parser, Subcommand};
use esoplan_core::PatientRecord;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "esoplan")]
#[command(about = "Esophageal/EGJ cancer treatment-pathway recommendation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a patient record and print the recommendation
    Recommend {
        /// Path to a patient record JSON file (default: read stdin)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the result as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Recommend { file, json }) => {
            let input = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let record: PatientRecord = serde_json::from_str(&input)?;
            let result = esoplan_core::recommend(&record)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Recommendation: {}", result.summary);
                println!();
                println!("Rationale:");
                for sentence in result.details.lines() {
                    println!("  - {sentence}");
                }
            }
        }
        None => {
            println!("No command given; try `esoplan recommend --help`.");
        }
    }

    Ok(())
}
