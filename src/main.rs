use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use job_role_predictor::batch::predict_csv;
use job_role_predictor::{Artifacts, Config, Field, Form, Outcome};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "job-role.toml";

/// Predict a job role from two skills and an educational qualification.
#[derive(Parser)]
#[command(name = "job-role", version)]
struct Cli {
    /// Directory holding the model artifacts (overrides the config file).
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the form on the terminal (default).
    Interactive,

    /// Predict a single selection.
    Predict {
        #[arg(long)]
        primary: String,
        #[arg(long)]
        secondary: String,
        #[arg(long)]
        education: String,
    },

    /// List the options the model knows about.
    Options {
        #[arg(long, value_enum)]
        field: Option<FieldArg>,
    },

    /// Predict every row of a CSV file.
    Batch {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Primary,
    Secondary,
    Education,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Primary => Field::Primary,
            FieldArg::Secondary => Field::Secondary,
            FieldArg::Education => Field::Education,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) if !path.exists() => bail!("config file {path:?} does not exist"),
        Some(path) => Config::load(path)?,
        None => Config::load(DEFAULT_CONFIG.as_ref())?,
    };
    if let Some(dir) = cli.model_dir {
        config.artifacts.model_dir = dir;
    }

    let artifacts = Artifacts::load(&config.artifact_paths())
        .context("model artifacts could not be loaded; fix the deployment and restart")?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => interactive(&artifacts),
        Command::Predict {
            primary,
            secondary,
            education,
        } => {
            let mut form = Form::with_inputs(&artifacts, &primary, &secondary, &education);
            match form.submit(&artifacts) {
                Outcome::Success(role) => {
                    println!("🚀 Your Predicted Job Role is: {role}");
                    Ok(())
                }
                failed => bail!(failed.message()),
            }
        }
        Command::Options { field } => {
            let fields = match field {
                Some(f) => vec![Field::from(f)],
                None => Field::ALL.to_vec(),
            };
            for field in fields {
                print_options(&artifacts, field);
            }
            Ok(())
        }
        Command::Batch { input, output } => {
            let reader = File::open(&input).with_context(|| format!("opening {input:?}"))?;
            let summary = match output {
                Some(path) => {
                    let writer = File::create(&path).with_context(|| format!("creating {path:?}"))?;
                    predict_csv(&artifacts, reader, writer)?
                }
                None => predict_csv(&artifacts, reader, io::stdout().lock())?,
            };
            eprintln!(
                "✅ {} predicted, {} failed",
                summary.predicted, summary.failed
            );
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_options(artifacts: &Artifacts, field: Field) {
    println!("{}:", field.label());
    for (i, option) in artifacts.vocabulary().options(field).iter().enumerate() {
        println!("{:>4}. {}", i + 1, option);
    }
}

fn interactive(artifacts: &Artifacts) -> anyhow::Result<()> {
    println!("✨ Job Role Predictor ✨");
    println!("Pick an option by name or number, '?' lists the options, 'exit' quits.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut form = Form::new();

    loop {
        for field in Field::ALL {
            loop {
                print!("Select your {}: ", field.label());
                io::stdout().flush()?;

                let Some(line) = lines.next().transpose()? else {
                    return Ok(());
                };
                let input = line.trim();
                if input.eq_ignore_ascii_case("exit") {
                    return Ok(());
                }
                if input == "?" {
                    print_options(artifacts, field);
                    continue;
                }
                form.select(artifacts, field, input);
                break;
            }
        }

        match form.submit(artifacts) {
            outcome @ Outcome::Success(_) => println!("🚀 {outcome}\n"),
            outcome => println!("⚠️  {outcome}\n"),
        }
    }
}
