//! `restock` command-line dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use restock_client::gateway::normalize_warehouse_id;
use restock_client::{
    AddOutcome, CartLine, ClientConfig, Dashboard, GatewayError, HttpGateway, InventorySource,
    Notice, NoticeLevel, OfflineSource, RecommendationSource, config::DEFAULT_CONFIG_FILE,
    format_inr, route_for_decision,
};
use restock_core::{ItemId, StoreId};
use restock_inventory::{SyntheticInventory, stock_gauge};
use restock_logistics::{Catalog, plan_route};
use restock_observability::LogFormat;

#[derive(Parser)]
#[command(name = "restock")]
#[command(about = "Inventory restock dashboard")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Recommendation service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Use synthetic inventory and the local heuristic instead of the service
    #[arg(long, global = true)]
    offline: bool,

    /// Seed for synthetic inventory
    #[arg(long)]
    seed: Option<u64>,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List inventory grouped by category
    Inventory {
        /// Case-insensitive filter on name or category
        #[arg(long)]
        search: Option<String>,
    },

    /// Generate a restock order for the whole inventory
    Generate,

    /// Forecast and sourcing for one item
    Predict {
        sku: String,
        #[arg(long)]
        store: Option<String>,
    },

    /// Predict one item and add it to the restock list
    Add {
        sku: String,
        #[arg(long)]
        store: Option<String>,
    },

    /// Great-circle distance between a warehouse and a destination
    Route {
        warehouse: String,
        destination: String,
    },

    /// Dashboard figures after generating a restock order
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config).context("loading configuration")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.pretty {
        config.log_format = LogFormat::Pretty;
    }
    config.validate()?;

    restock_observability::init_with(config.log_format);

    let dashboard = build_dashboard(&config, cli.offline)?;
    let result = run(cli.command, &config, cli.offline, &dashboard).await;
    print_notices(&dashboard.take_notices().await);
    result
}

fn build_dashboard(config: &ClientConfig, offline: bool) -> Result<Dashboard> {
    let store = config.default_store()?;
    let source: Arc<dyn RecommendationSource> = if offline {
        Arc::new(OfflineSource::new(store.clone(), config.seed))
    } else {
        Arc::new(HttpGateway::new(&config.base_url, config.timeout(), store.clone())?)
    };
    Ok(Dashboard::new(source, config.policy()?, store))
}

async fn load_inventory(dashboard: &Dashboard, config: &ClientConfig, offline: bool) -> Result<()> {
    if offline || config.inventory_source == InventorySource::Remote {
        let outcome = dashboard.load_inventory().await?;
        tracing::info!(loaded = outcome.loaded, rejected = outcome.rejected, "inventory loaded");
        return Ok(());
    }

    let generator = SyntheticInventory::new(config.default_store()?);
    let generator = match config.seed {
        Some(seed) => generator.with_seed(seed),
        None => generator,
    };
    dashboard.replace_inventory(generator.generate()?).await;
    Ok(())
}

/// Gateway errors reach the terminal as the same text the dashboard shows.
fn user_facing(err: GatewayError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

async fn run(
    command: Commands,
    config: &ClientConfig,
    offline: bool,
    dashboard: &Dashboard,
) -> Result<()> {
    match command {
        Commands::Inventory { search } => {
            load_inventory(dashboard, config, offline).await?;
            if let Some(term) = search {
                dashboard.set_search_term(term).await;
            }
            let sections = dashboard.grouped().await;
            if sections.is_empty() {
                println!("No items found.");
            }
            for section in sections {
                println!("{} ({})", section.category, section.items.len());
                for item in section.items {
                    let gauge = stock_gauge(item.current_stock(), item.reorder_point());
                    println!(
                        "  {:<8} {:<36} stock {:>4} / rop {:>4}  {:>3.0}% {:?}  {}",
                        item.id(),
                        item.name(),
                        item.current_stock(),
                        item.reorder_point(),
                        gauge.percent,
                        gauge.level,
                        format_inr(item.price()),
                    );
                }
            }
        }

        Commands::Generate => {
            load_inventory(dashboard, config, offline).await?;
            let outcome = dashboard
                .generate_restock_order()
                .await
                .map_err(user_facing)?;
            println!(
                "Generated {} lines ({} critical, {} skipped)",
                outcome.lines, outcome.critical, outcome.skipped
            );
            for line in dashboard.cart_lines().await {
                print_line(&line);
            }
        }

        Commands::Predict { sku, store } => {
            let sku = ItemId::new(sku)?;
            let store = store.map(StoreId::new).transpose()?;
            let decision = dashboard
                .request_decision(&sku, store)
                .await
                .map_err(user_facing)?;
            println!(
                "{}: forecast {:.1}, order {:.0} from {} by {} (total {})",
                decision.sku,
                decision.forecast,
                decision.order_quantity,
                decision.recommended_warehouse,
                decision.transport,
                format_inr(decision.total_cost),
            );
            match route_for_decision(&Catalog::builtin(), &decision, dashboard.default_store()) {
                Ok(route) => println!(
                    "Route: {} -> {}, {} km",
                    route.from.name, route.to.name, route.distance_km
                ),
                Err(err) => tracing::warn!(error = %err, "no route for decision"),
            }
        }

        Commands::Add { sku, store } => {
            load_inventory(dashboard, config, offline).await?;
            let sku = ItemId::new(sku)?;
            let store = store.map(StoreId::new).transpose()?;
            let decision = dashboard
                .request_decision(&sku, store)
                .await
                .map_err(user_facing)?;
            let added = dashboard
                .add_decision_to_cart(&decision)
                .await
                .map_err(user_facing)?;
            match added {
                AddOutcome::Added => {
                    for line in dashboard.cart_lines().await {
                        print_line(&line);
                    }
                }
                AddOutcome::AlreadyInCart => println!("{sku} is already in the restock list"),
            }
        }

        Commands::Route { warehouse, destination } => {
            let catalog = Catalog::builtin();
            let warehouse = normalize_warehouse_id(&warehouse)?;
            let from = catalog.warehouse(&warehouse)?;
            let to = catalog.site(&destination)?;
            if from.id == to.id {
                bail!("origin and destination are the same site");
            }
            let route = plan_route(from, to);
            println!(
                "{} ({}) -> {} ({}): {} km",
                route.from.name, route.from.city, route.to.name, route.to.city, route.distance_km
            );
        }

        Commands::Summary => {
            load_inventory(dashboard, config, offline).await?;
            dashboard
                .generate_restock_order()
                .await
                .map_err(user_facing)?;
            let summary = dashboard.summary().await;
            println!("Total products:     {}", summary.total_products);
            println!("Restock lines:      {}", summary.lines);
            println!("Critical lines:     {}", summary.critical);
            println!("Est. order value:   {}", format_inr(summary.total_order_value));
        }
    }
    Ok(())
}

fn print_line(line: &CartLine) {
    println!(
        "  [{:<6}] {:<8} {:<36} {:<12} order {:>4}  demand {:>6.1}  {}",
        format!("{:?}", line.badge).to_lowercase(),
        line.item_id(),
        line.item.name(),
        line.status.label(),
        line.order_quantity,
        line.predicted_demand,
        format_inr(line.estimated_cost()),
    );
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}
