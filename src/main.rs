use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whattoeat::config::{Config, ConfigOverrides};
use whattoeat::menu::engine::recommend;
use whattoeat::menu::{DishRecommendation, RecommendationOutcome, WhatToEatParams};
use whattoeat::output::csv::{shopping_list_to_csv, tools_to_csv};
use whattoeat::output::json::render_json;
use whattoeat::output::table::{
    render_dishes_table, render_shopping_table, render_summary_table, render_tools_table,
};
use whattoeat::recipes::store::{RecipeSource, RemoteRecipeStore, StaticRecipeStore};
use whattoeat::server::run_server;
use whattoeat::tools::{ToolDescriptor, ToolRegistry};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "whattoeat",
    about = "Recipe tools and reproducible menu recommendations"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Recipe dataset URL
    #[arg(short, long)]
    source: Option<String>,
    /// Local recipe dataset (JSON array), used instead of the URL
    #[arg(short, long)]
    recipes: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Recommend {
        #[arg(long, default_value_t = 4)]
        people: i64,
        #[arg(long)]
        fish: bool,
        #[arg(long)]
        vegetarian: bool,
        #[arg(long, value_delimiter = ',')]
        avoid: Vec<String>,
        #[arg(long)]
        dishes: Option<u32>,
        #[arg(long)]
        seed: Option<f64>,
    },
    Tools,
    Exec {
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        source_url: cli.source.clone(),
        recipes_file: cli.recipes.clone(),
        host,
        port,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let source = build_source(&config)?;
    let registry = ToolRegistry::with_defaults(source.clone());

    match &cli.command {
        Commands::Serve { .. } => {
            let addr = config.bind_addr().await?;
            return run_server(registry, addr).await;
        }
        Commands::Recommend {
            people,
            fish,
            vegetarian,
            avoid,
            dishes,
            seed,
        } => {
            let seed = seed
                .filter(|seed| seed.is_finite() && *seed != 0.0)
                .unwrap_or_else(|| Utc::now().timestamp_millis() as f64);
            let params = WhatToEatParams {
                prefer_fish: *fish,
                vegetarian: *vegetarian,
                avoid_ingredients: avoid
                    .iter()
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect(),
                dish_count: dishes.filter(|count| *count > 0),
                ..WhatToEatParams::new(*people, seed)
            };
            let recipes = source.all_recipes().await;
            let outcome = recommend(&params, &recipes);
            print_outcome(&outcome, seed, cli.output)?;
        }
        Commands::Tools => print_tools(&registry.descriptors(), cli.output)?,
        Commands::Exec { tool, args } => {
            let args = args
                .as_deref()
                .map(serde_json::from_str::<Value>)
                .transpose()
                .context("--args must be valid JSON")?;
            let handler = registry
                .by_name(tool)
                .ok_or_else(|| anyhow!("Unknown tool: {tool}"))?;
            let value = handler.execute(args.as_ref()).await?;
            if !matches!(cli.output, OutputFormat::Json) {
                warn!("exec prints JSON regardless of --output");
            }
            println!("{}", render_json(&value)?);
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn build_source(config: &Config) -> Result<Arc<dyn RecipeSource>> {
    if let Some(path) = config.resolved_recipes_file() {
        info!("using local recipe dataset {}", path.display());
        return Ok(Arc::new(StaticRecipeStore::from_path(&path)?));
    }
    let store = RemoteRecipeStore::new(
        config.source.url.clone(),
        config.source.cache_ttl_secs,
        config.source.fetch_timeout_secs,
    )?;
    info!("using remote recipe dataset {}", store.url());
    Ok(Arc::new(store))
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_outcome(outcome: &RecommendationOutcome, seed: f64, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", render_json(outcome)?);
        return Ok(());
    }
    match outcome {
        RecommendationOutcome::Menu(menu) => print_menu(menu, seed, format),
        RecommendationOutcome::NoData { message } => {
            println!("{message}");
            Ok(())
        }
        RecommendationOutcome::Error { error } => Err(anyhow!("{error}")),
    }
}

fn print_menu(menu: &DishRecommendation, seed: f64, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_dishes_table(menu));
            println!("{}", render_shopping_table(&menu.shopping_list));
            println!("{}", render_summary_table(menu));
            println!("{}", menu.message);
            println!("seed: {seed}");
        }
        OutputFormat::Json => println!("{}", render_json(menu)?),
        OutputFormat::Csv => print!("{}", shopping_list_to_csv(&menu.shopping_list)?),
    }
    Ok(())
}

fn print_tools(tools: &[ToolDescriptor], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_tools_table(tools)),
        OutputFormat::Json => println!("{}", render_json(tools)?),
        OutputFormat::Csv => print!("{}", tools_to_csv(tools)?),
    }
    Ok(())
}
