//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sqlite_adapter::SqliteHoldingStore;
use crate::adapters::twelvedata_adapter::TwelveDataAdapter;
use crate::domain::error::PricesweepError;
use crate::domain::estimator::PriceEstimator;
use crate::domain::refresh::RefreshJob;
use crate::domain::resolver::PriceResolver;
use crate::domain::settings::SweepSettings;
use crate::domain::symbol::Symbol;

#[derive(Parser, Debug)]
#[command(name = "pricesweep", about = "Portfolio tracker with live price refresh")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the periodic price sweep
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Execute a single sweep tick and exit
        #[arg(long)]
        once: bool,
    },
    /// List all tracked holdings
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Add a holding for an owner
    Add {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        buy_price: f64,
        #[arg(long)]
        owner: i64,
    },
    /// Remove a holding by id
    Remove {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: i64,
    },
    /// Create the database schema
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();
    match cli.command {
        Command::Run { config, once } => run_sweep(&config, once),
        Command::List { config } => run_list(&config),
        Command::Add {
            config,
            symbol,
            quantity,
            buy_price,
            owner,
        } => run_add(&config, &symbol, quantity, buy_price, owner),
        Command::Remove { config, id } => run_remove(&config, id),
        Command::InitDb { config } => run_init_db(&config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PricesweepError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(config: &FileConfigAdapter) -> Result<SqliteHoldingStore, ExitCode> {
    let store = SqliteHoldingStore::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    store.initialize_schema().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(store)
}

fn run_sweep(config_path: &PathBuf, once: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let settings = match SweepSettings::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if settings.api_key.is_none() {
        eprintln!("warning: no TwelveData API key configured; all prices will be simulated");
    }

    let store = match open_store(&config) {
        Ok(s) => Arc::new(s),
        Err(code) => return code,
    };

    let source = Arc::new(TwelveDataAdapter::new(settings.api_key.clone()));
    let resolver = PriceResolver::new(source, PriceEstimator::new(settings.drift_bound));
    let job = RefreshJob::new(store, resolver, settings.period, settings.concurrency);

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        if once {
            match job.run_tick().await {
                Ok(count) => {
                    eprintln!("updated {count} holdings");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let err = PricesweepError::from(e);
                    eprintln!("error: {err}");
                    ExitCode::from(&err)
                }
            }
        } else {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(true);
                }
            });

            eprintln!(
                "Starting price sweep every {}s",
                settings.period.as_secs()
            );
            job.run(shutdown_rx).await;
            eprintln!("Shutting down");
            ExitCode::SUCCESS
        }
    })
}

fn run_list(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let holdings = match store.list_holdings() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!(
        "{:>5}  {:<8} {:>8} {:>10} {:>10} {:>6}",
        "id", "symbol", "qty", "buy", "last", "owner"
    );
    for h in &holdings {
        println!(
            "{:>5}  {:<8} {:>8} {:>10.2} {:>10.2} {:>6}",
            h.id,
            h.symbol.as_str(),
            h.quantity,
            h.buy_price,
            h.last_price,
            h.owner_id
        );
    }
    ExitCode::SUCCESS
}

fn run_add(
    config_path: &PathBuf,
    symbol: &str,
    quantity: i64,
    buy_price: f64,
    owner: i64,
) -> ExitCode {
    let symbol = match Symbol::new(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.insert_holding(symbol, quantity, buy_price, owner) {
        Ok(holding) => {
            println!("added holding {} ({})", holding.id, holding.symbol);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_remove(config_path: &PathBuf, id: i64) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.delete_holding(id) {
        Ok(true) => {
            println!("removed holding {id}");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("no holding with id {id}");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_init_db(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    match open_store(&config) {
        Ok(_) => {
            eprintln!("schema ready");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
