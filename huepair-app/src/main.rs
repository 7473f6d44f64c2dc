use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huepair_core::AnalysisConfig;
use huepair_library::{PaletteLibrary, Scope};

mod render;
mod session;

use session::Session;

#[derive(Parser)]
#[command(name = "huepair")]
#[command(about = "Find an image's dominant color and matching color pairings", version)]
struct Cli {
    /// Palette library database
    #[arg(long, env = "HUEPAIR_DB", default_value = "huepair.db", global = true)]
    db: PathBuf,

    /// Application id used to scope saved palettes
    #[arg(long, env = "HUEPAIR_APP_ID", default_value = "default-app", global = true)]
    app_id: String,

    /// User id used to scope saved palettes
    #[arg(long, env = "HUEPAIR_USER_ID", default_value = "local", global = true)]
    user_id: String,

    /// Sampling configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze an image and print its pairings
    Analyze {
        image: PathBuf,

        /// Save the palette to the library
        #[arg(long)]
        save: bool,

        /// Print the palette as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved palettes, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one saved palette in full
    Show { id: i64 },
    /// Print the effective sampling configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    let scope = Scope::new(cli.app_id.clone(), cli.user_id.clone());
    let ansi = std::io::stdout().is_terminal();

    match cli.command {
        Command::Analyze { image, save, json } => {
            // decode off the async runtime, then analyze
            let path = image.clone();
            let mut session = tokio::task::spawn_blocking(move || {
                let mut session = Session::new(config);
                session.load(&path).map(|()| session)
            })
            .await
            .context("image decode task failed")?
            .map_err(|e| {
                log::error!("{}", e);
                anyhow::anyhow!(e.user_message())
            })?;

            if let Some(path) = session.image_path() {
                log::info!("Analyzing {}", path.display());
            }
            let analysis = session.analyze()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis.palette)?);
            } else {
                print!("{}", render::palette(&analysis.palette, ansi));
            }

            if save {
                let library = PaletteLibrary::open(&cli.db)
                    .with_context(|| format!("opening {}", cli.db.display()))?;
                let mut subscription = library.subscribe(&scope)?;
                subscription.try_next();

                let stored = session.save(&library, &scope)?;
                log::info!("Palette saved as #{}", stored.id);

                if let Some(snapshot) = subscription.try_next() {
                    if !json {
                        println!();
                        println!("Saved palettes ({}):", snapshot.len());
                        print!("{}", render::saved(&snapshot, ansi));
                    }
                }
            }
        }
        Command::List { json } => {
            let library = PaletteLibrary::open(&cli.db)
                .with_context(|| format!("opening {}", cli.db.display()))?;
            let palettes = library.query(&scope)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&palettes)?);
            } else {
                print!("{}", render::saved(&palettes, ansi));
            }
        }
        Command::Show { id } => {
            let library = PaletteLibrary::open(&cli.db)
                .with_context(|| format!("opening {}", cli.db.display()))?;
            let stored = library.get(&scope, id)?;
            println!(
                "Palette #{} from {}",
                stored.id,
                stored.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
            print!("{}", render::palette(&stored.palette(), ansi));
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
