use anyhow::Context;
use clap::Parser;
use joinviz::catalog::{Catalog, SchemaStore};
use joinviz::config::{self, OutputFormat, VisualizerConfig};
use joinviz::join::{calculate_join_stats, parse_table, JoinEvaluator, JoinType, UnknownJoinPolicy};
use joinviz::render;
use validator::Validate;

/// joinviz - See what each SQL join does to a small employees dataset
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Left table (employees, departments, offices)
    #[arg(long, default_value = "employees")]
    left: String,

    /// Right table (employees, departments, offices)
    #[arg(long, default_value = "departments")]
    right: String,

    /// Join type (INNER, LEFT, RIGHT, FULL, CROSS)
    #[arg(long = "join", default_value = "INNER")]
    join_type: String,

    /// Dataset YAML file to use instead of the bundled one
    #[arg(long)]
    schema: Option<String>,

    /// Output format (table or json)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Rows printed per table before eliding the rest
    #[arg(long)]
    max_rows: Option<usize>,

    /// Also print both input tables
    #[arg(long)]
    show_sources: bool,

    /// Unknown join types: reject (default) or evaluate as inner
    #[arg(long)]
    join_fallback: Option<UnknownJoinPolicy>,

    /// List declared relationships and exit
    #[arg(long)]
    list_relationships: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            schema_path: cli.schema.clone(),
            output_format: cli.format,
            max_display_rows: cli.max_rows,
            unknown_join_policy: cli.join_fallback,
            show_source_tables: cli.show_sources,
        }
    }
}

fn load_catalog(config: &VisualizerConfig) -> anyhow::Result<Catalog> {
    match &config.schema_path {
        Some(path) => Catalog::from_yaml_file(path)
            .with_context(|| format!("Failed to load dataset from {}", path)),
        None => Ok(Catalog::builtin()?.clone()),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Environment provides the base, CLI flags override it
    let mut config = VisualizerConfig::from_env().context("Configuration error")?;
    config.merge(config::CliConfig::from(&cli));
    config.validate().context("Configuration error")?;

    let catalog = load_catalog(&config)?;

    if cli.list_relationships {
        print!("{}", render::relationships_listing(&catalog));
        return Ok(());
    }

    let left = parse_table(&cli.left)?;
    let right = parse_table(&cli.right)?;
    let join_type = JoinType::parse_with_policy(&cli.join_type, config.unknown_join_policy)?;

    let result = JoinEvaluator::new(&catalog).perform_join(left, right, join_type)?;
    let stats = calculate_join_stats(&catalog, left, right, join_type)?;

    if config.output_format == OutputFormat::Json {
        println!("{}", render::render_json(&catalog, &result, &stats)?);
        return Ok(());
    }

    if config.show_source_tables {
        println!("{}", render::source_table(&catalog, left, config.max_display_rows));
        println!("{}", render::source_table(&catalog, right, config.max_display_rows));
    }

    if join_type.uses_keys() {
        if !catalog.relationships().is_related(left, right) {
            log::warn!("{} and {} have no declared relationship", left, right);
        }
        println!("{}", render::relationship_summary(&catalog, left, right));
    }
    println!("{}", render::stats_summary(left, right, join_type, &stats));
    print!("{}", render::result_table(&result, config.max_display_rows));

    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
