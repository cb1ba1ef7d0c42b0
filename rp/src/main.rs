//! Retreat planner - staged group travel planning
//!
//! CLI entry point driving the planning pipeline over files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use retreatplan::cart::{Cart, CartModification};
use retreatplan::cli::{Cli, Command, OutputFormat, SessionCommand, get_log_path};
use retreatplan::collaborators::{CheckoutRequest, SimulatedCheckout, StaticCatalog, StructuredExtractor};
use retreatplan::config::Config;
use retreatplan::domain::{Confirmation, Ranking, Session, WeightOverrides};
use retreatplan::pipeline::Planner;
use retreatplan::state::StateManager;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            requirements,
            catalog,
            weights,
            package,
            modify,
            checkout,
            store,
            format,
        } => {
            let inputs = PlanInputs {
                requirements,
                catalog,
                weights,
                package,
                modify,
                checkout,
            };
            cmd_plan(&config, inputs, store, format).await
        }
        Command::Rank {
            requirements,
            catalog,
            weights,
            top,
            format,
        } => cmd_rank(&config, &requirements, &catalog, weights.as_deref(), top, format).await,
        Command::Session { command, store } => cmd_session(&config, command, store).await,
        Command::Weights => cmd_weights(&config),
    }
}

/// Files feeding one `plan` run
struct PlanInputs {
    requirements: PathBuf,
    catalog: PathBuf,
    weights: Option<PathBuf>,
    package: Option<String>,
    modify: Option<PathBuf>,
    checkout: Option<PathBuf>,
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path).context(format!("Failed to read {} from {}", what, path.display()))?;
    serde_yaml::from_str(&content).context(format!("Failed to parse {} from {}", what, path.display()))
}

fn open_state(config: &Config, store: Option<PathBuf>) -> Result<StateManager> {
    match store {
        Some(dir) => StateManager::spawn(&dir),
        None if config.storage.in_memory => Ok(StateManager::spawn_in_memory()),
        None => StateManager::spawn(&config.storage.session_dir),
    }
}

async fn cmd_plan(config: &Config, inputs: PlanInputs, store: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    debug!(requirements = %inputs.requirements.display(), "cmd_plan: called");
    let planner = Planner::from_config(open_state(config, store)?, config);

    let text = fs::read_to_string(&inputs.requirements)
        .context(format!("Failed to read requirements from {}", inputs.requirements.display()))?;
    let search = StaticCatalog::from_file(&inputs.catalog).context("Failed to load catalog")?;
    let overrides: Option<WeightOverrides> = match &inputs.weights {
        Some(path) => Some(read_yaml(path, "weights")?),
        None => None,
    };

    let id = planner.create_session().await?;
    planner.analyze_with(&id, &StructuredExtractor, &text).await?;
    planner.discover_with(&id, &search).await?;
    let session = planner.rank_packages(&id, overrides).await?;

    if session.ranking.as_ref().is_some_and(Ranking::is_empty) {
        return print_session(&session, format);
    }

    let mut session = planner.build_cart(&id, inputs.package).await?;
    if let Some(path) = &inputs.modify {
        let modifications: Vec<CartModification> = read_yaml(path, "cart modifications")?;
        for modification in modifications {
            session = planner.modify_cart(&id, modification).await?;
        }
    }
    if let Some(path) = &inputs.checkout {
        let request: CheckoutRequest = read_yaml(path, "checkout request")?;
        session = planner.checkout(&id, &SimulatedCheckout, &request).await?;
    }

    print_session(&session, format)
}

async fn cmd_rank(
    config: &Config,
    requirements: &Path,
    catalog: &Path,
    weights: Option<&Path>,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    debug!(top, "cmd_rank: called");
    let planner = Planner::from_config(StateManager::spawn_in_memory(), config);

    let text = fs::read_to_string(requirements)
        .context(format!("Failed to read requirements from {}", requirements.display()))?;
    let search = StaticCatalog::from_file(catalog).context("Failed to load catalog")?;
    let overrides: Option<WeightOverrides> = match weights {
        Some(path) => Some(read_yaml(path, "weights")?),
        None => None,
    };

    let id = planner.create_session().await?;
    planner.analyze_with(&id, &StructuredExtractor, &text).await?;
    planner.discover_with(&id, &search).await?;
    let session = planner.rank_packages(&id, overrides).await?;
    let Some(mut ranking) = session.ranking else {
        return Ok(());
    };
    ranking.packages.truncate(top);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranking)?),
        OutputFormat::Text => print_ranking(&ranking),
    }
    Ok(())
}

async fn cmd_session(config: &Config, command: SessionCommand, store: Option<PathBuf>) -> Result<()> {
    debug!(?command, "cmd_session: called");
    let state = open_state(config, store)?;
    let planner = Planner::from_config(state, config);

    match command {
        SessionCommand::List { format } => {
            let sessions = planner.list_sessions().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
                OutputFormat::Text => {
                    if sessions.is_empty() {
                        println!("No sessions");
                    }
                    for session in &sessions {
                        println!(
                            "{}  {:<22} rev {}",
                            session.id.bold(),
                            session.stage.to_string().cyan(),
                            session.revision
                        );
                    }
                }
            }
            Ok(())
        }
        SessionCommand::Show { id, format } => {
            let session = planner.get_session(&id).await?;
            print_session(&session, format)
        }
        SessionCommand::Delete { id } => {
            if planner.delete_session(&id).await? {
                println!("{} {}", "Deleted".green(), id);
            } else {
                println!("{} {}", "No such session:".yellow(), id);
            }
            Ok(())
        }
    }
}

fn cmd_weights(config: &Config) -> Result<()> {
    debug!("cmd_weights: called");
    print!("{}", serde_yaml::to_string(&config.weight_profile())?);
    Ok(())
}

fn print_session(session: &Session, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    println!("{} {}  [{}]", "Session".bold(), session.id, session.stage.to_string().cyan());
    if let Some(req) = &session.requirements {
        println!(
            "  {} attendees, {} to {} in {}, budget ${:.2}",
            req.attendees, req.start_date, req.end_date, req.location, req.budget
        );
    }
    if let Some(ranking) = &session.ranking {
        println!();
        print_ranking(ranking);
    }
    if let Some(cart) = &session.cart {
        println!();
        print_cart(cart);
    }
    if let Some(confirmation) = &session.confirmation {
        println!();
        print_confirmation(confirmation);
    }
    Ok(())
}

fn print_ranking(ranking: &Ranking) {
    if let Some(diagnostic) = &ranking.diagnostic {
        println!("{} {}", "No packages:".yellow().bold(), diagnostic);
        return;
    }
    if ranking.all_over_budget() {
        println!("{}", "No package fits the budget; showing all".yellow());
    }
    println!("{} ({} of {} considered)", "Packages".bold(), ranking.packages.len(), ranking.considered);
    for package in &ranking.packages {
        let score = format!("{:.3}", package.score);
        println!(
            "  #{:<3} {}  ${:.2}  {}",
            package.rank,
            score.green(),
            package.estimated_cost,
            package.package_id
        );
        println!("        {}", package.explanation.dimmed());
    }
}

fn print_cart(cart: &Cart) {
    println!("{} {}  [{}]", "Cart".bold(), cart.cart_id, cart.state);
    for line in &cart.lines {
        println!(
            "  {:<8} {:<14} {:<28} {:>6} x ${:>10.2} = ${:>12.2}",
            line.line_id, line.category, line.option.vendor, line.quantity, line.unit_price, line.line_total
        );
    }
    println!("  {:<60} ${:>12.2}", "Subtotal", cart.subtotal);
    println!("  {:<60} ${:>12.2}", "Tax", cart.tax);
    println!("  {:<60} ${:>12.2}", "Fees", cart.fees);
    println!("  {:<60} ${:>12.2}", "Total".bold(), cart.total);
}

fn print_confirmation(confirmation: &Confirmation) {
    println!("{} {}", "Booked".green().bold(), confirmation.booking_id);
    for vc in &confirmation.vendor_confirmations {
        println!("  {:<14} {:<28} {}", vc.category, vc.vendor, vc.confirmation_code);
    }
    println!("  Charged ${:.2}", confirmation.total_charged);
}
