use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use texfit_core::{BoxSize, EngineConfig, FitEngine, FitRequest, RenderState, Viewport};
use texfit_layout::{smart_rows, split, RowPolicy};
use texfit_syntax::analysis::analyze;
use texfit_syntax::scan;

#[derive(Parser)]
#[command(name = "texfit")]
#[command(about = "Adaptive layout for LaTeX math expressions", long_about = None)]
struct Cli {
    /// JSON engine configuration; unspecified fields keep their defaults
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print operator positions and delimiter pairs
    Scan { expression: String },
    /// Split an expression into top-level terms
    Split {
        /// Break at the first top-level `=` before anything else
        #[arg(long)]
        equals: bool,
        expression: String,
    },
    /// Report complexity metrics
    Analyze { expression: String },
    /// List layout candidates, identity first
    Candidates { expression: String },
    /// Choose the best layout and font size for a container
    Fit {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long, default_value_t = 1280.0)]
        viewport_width: f64,
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f64,
        expression: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Scan { expression } => {
            println!("{}", serde_json::to_string_pretty(&scan(&expression))?);
        }
        Commands::Split { equals, expression } => {
            if equals {
                let policy = RowPolicy {
                    terms_per_line: 1,
                    prioritize_equals: true,
                    compact: false,
                };
                let rows = smart_rows(&expression, &policy);
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&split(&expression))?);
            }
        }
        Commands::Analyze { expression } => {
            println!("{}", serde_json::to_string_pretty(&analyze(&expression))?);
        }
        Commands::Candidates { expression } => {
            let engine = FitEngine::new().with_config(config);
            println!(
                "{}",
                serde_json::to_string_pretty(&engine.candidates(&expression))?
            );
        }
        Commands::Fit {
            width,
            height,
            viewport_width,
            viewport_height,
            expression,
        } => {
            let engine = FitEngine::new().with_config(config);
            let request = FitRequest {
                expression,
                container: BoxSize::new(width, height),
                viewport: Viewport::new(viewport_width, viewport_height),
            };
            debug!("device class {:?}", engine.device(request.viewport).class);
            let state = RenderState::from(engine.fit(&request));
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }
    Ok(())
}
