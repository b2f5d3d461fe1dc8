//! `filterctl` CLI: inspect category schemas, replay filter edits and
//! normalize filter state from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List the registered categories
//! filterctl categories
//!
//! # Print one category's schema as JSON
//! filterctl schema Automotive
//!
//! # Show the fields visible for a saved state (stdin → stdout)
//! cat state.json | filterctl resolve
//!
//! # Build a state from edits
//! filterctl apply --category Electronics --set deviceType=laptops --set storage=256gb,1tb
//!
//! # Replay a JSON list of transitions on top of a saved state
//! filterctl apply --state state.json -t transitions.json
//!
//! # Normalize a state into a query string
//! filterctl normalize -i state.json --query-string
//!
//! # Use a custom registry and config
//! filterctl --registry registry.json --config engine.json categories
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use filter_engine::input::{parse_field_value, parse_price, price_bounds};
use filter_engine::state::{MAX_PRICE_KEY, MIN_PRICE_KEY};
use filter_engine::{
    catalog, Category, EngineConfig, FilterEngine, FilterState, GlobalField, ResetPolicy,
    SchemaRegistry, Transition,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "filterctl",
    version,
    about = "Category-dependent filter engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Registry document (JSON) to use instead of the built-in categories
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Engine config (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions (pruning, ignored writes) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered categories
    Categories,
    /// Print the filter schema of one category as JSON
    Schema {
        /// Category name, matched exactly
        category: String,
    },
    /// Print the fields visible for a state, with their current options
    Resolve {
        /// State file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Apply edits to a state and print the resulting state
    ///
    /// Edits run in this order: --category, --transitions, prices, --set.
    Apply {
        /// Starting state file (default state if omitted)
        #[arg(long)]
        state: Option<String>,
        /// JSON array of transitions to replay
        #[arg(short, long)]
        transitions: Option<String>,
        /// Select a category by name
        #[arg(long)]
        category: Option<String>,
        /// Numeric id for --category
        #[arg(long, default_value_t = 0, requires = "category")]
        category_id: i64,
        /// Minimum price
        #[arg(long)]
        min_price: Option<String>,
        /// Maximum price
        #[arg(long)]
        max_price: Option<String>,
        /// Set a category field, as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,
        /// Override the configured reset policy
        #[arg(long, value_enum)]
        reset_policy: Option<PolicyArg>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Normalize a state into a query descriptor
    Normalize {
        /// State file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print a URL query string instead of JSON
        #[arg(long)]
        query_string: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    PreserveCategory,
    ClearCategory,
}

impl From<PolicyArg> for ResetPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PreserveCategory => ResetPolicy::PreserveCategory,
            PolicyArg::ClearCategory => ResetPolicy::ClearCategory,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = match cli.registry.as_deref() {
        Some(path) => SchemaRegistry::from_json(&read_file(path)?)
            .with_context(|| format!("Invalid registry: {}", path))?,
        None => catalog::builtin_registry().context("Built-in registry is invalid")?,
    };
    let mut config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_json(&read_file(path)?)
            .with_context(|| format!("Invalid config: {}", path))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Categories => {
            write_output(None, &registry.categories().join("\n"))?;
        }
        Commands::Schema { category } => {
            if !registry.contains(&category) {
                bail!(
                    "Unknown category: '{}'. Available: {}",
                    category,
                    registry.categories().join(", ")
                );
            }
            let schema = registry.resolve(Some(&category));
            let json = serde_json::to_string_pretty(schema)?;
            write_output(None, &json)?;
        }
        Commands::Resolve { input } => {
            let engine = FilterEngine::new(registry, config);
            let state = parse_state(&read_input(input.as_deref())?)?;
            let fields: Vec<serde_json::Value> = engine
                .visible_fields(&state)
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "key": f.key(),
                        "kind": f.field.kind,
                        "options": f.effective_options,
                        "value": state.category_value(f.key()),
                    })
                })
                .collect();
            write_output(None, &serde_json::to_string_pretty(&fields)?)?;
        }
        Commands::Apply {
            state,
            transitions,
            category,
            category_id,
            min_price,
            max_price,
            sets,
            reset_policy,
            output,
        } => {
            if let Some(policy) = reset_policy {
                config.reset_policy = policy.into();
            }
            let engine = FilterEngine::new(registry, config);

            let mut current = match state.as_deref() {
                Some(path) => parse_state(&read_file(path)?)?,
                None => FilterState::default(),
            };

            if let Some(name) = category {
                let change = Transition::ChangeCategory {
                    category: Some(Category::new(category_id, name)),
                };
                current = engine.apply(&current, &change);
            }

            if let Some(path) = transitions.as_deref() {
                let list: Vec<Transition> = serde_json::from_str(&read_file(path)?)
                    .with_context(|| format!("Invalid transitions: {}", path))?;
                tracing::debug!(count = list.len(), "replaying transitions");
                current = engine.apply_all(&current, &list);
            }

            if min_price.is_some() || max_price.is_some() {
                let min = match min_price.as_deref() {
                    Some(raw) => parse_price(MIN_PRICE_KEY, raw)?,
                    None => current.min_price,
                };
                let max = match max_price.as_deref() {
                    Some(raw) => parse_price(MAX_PRICE_KEY, raw)?,
                    None => current.max_price,
                };
                let (min, max) = price_bounds(min, max)?;
                current = engine.apply(&current, &Transition::SetGlobal(GlobalField::MinPrice(min)));
                current = engine.apply(&current, &Transition::SetGlobal(GlobalField::MaxPrice(max)));
            }

            for assignment in &sets {
                current = apply_assignment(&engine, &current, assignment)?;
            }

            let json = serde_json::to_string_pretty(&current)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Normalize {
            input,
            output,
            query_string,
        } => {
            let engine = FilterEngine::new(registry, config);
            let state = parse_state(&read_input(input.as_deref())?)?;
            let query = engine.normalize(&state);
            let rendered = if query_string {
                query.to_query_string()
            } else {
                query.to_json()
            };
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

/// Apply one `key=value` assignment to a visible category field.
///
/// - `--set color=red,black` sets a multi-select
/// - `--set year=2010..2020` sets a range
/// - `--set brand=` clears the field
fn apply_assignment(engine: &FilterEngine, state: &FilterState, assignment: &str) -> Result<FilterState> {
    let Some((key, raw)) = assignment.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", assignment);
    };
    let key = key.trim();

    let value = {
        let visible = engine.visible_fields(state);
        let Some(field) = visible.iter().find(|f| f.key() == key) else {
            bail!(
                "Field '{}' is not visible in category '{}'",
                key,
                state.category_key().unwrap_or("<none>")
            );
        };
        parse_field_value(field, raw)?
    };

    Ok(engine.apply(
        state,
        &Transition::SetCategoryField {
            key: key.to_string(),
            value,
        },
    ))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FILTERCTL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn parse_state(json: &str) -> Result<FilterState> {
    serde_json::from_str(json).context("Failed to parse filter state")
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
