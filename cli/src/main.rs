use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use harvest_core::{AiConfig, DefaultEngine, SearchConfig};
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Turn leftover ingredients into recipes", long_about = None)]
struct Cli {
    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one recipe from the given ingredients
    Recipe {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Suggest three eco-friendly recipes
    Suggest {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Suggest meals and link each one to a recipe page
    Meals {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Suggest dish titles for a single food, e.g. `harvest ideas sweet potato`
    Ideas {
        #[arg(required = true)]
        food: Vec<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    let ai = AiConfig::from_env().context("Failed to load generation settings")?;
    let search = SearchConfig::from_env().context("Failed to load search settings")?;
    let engine =
        DefaultEngine::from_config(&ai, &search).context("Failed to build HTTP clients")?;

    let output = tokio::select! {
        result = run(&engine, cli.command) => result?,
        _ = tokio::signal::ctrl_c() => bail!("Interrupted"),
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

async fn run(engine: &DefaultEngine, command: Commands) -> Result<Value> {
    let value = match command {
        Commands::Recipe { ingredients } => {
            serde_json::to_value(engine.generate_recipe(&ingredients).await?)?
        }
        Commands::Suggest { ingredients } => {
            serde_json::to_value(engine.auto_suggest(&ingredients).await?)?
        }
        Commands::Meals { ingredients } => {
            serde_json::to_value(engine.meal_links(&ingredients).await?)?
        }
        Commands::Ideas { food } => {
            serde_json::to_value(engine.suggestions(&food.join(" ")).await?)?
        }
    };
    Ok(value)
}
