use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use orderbench::prelude::*;
use tokio::sync::watch;
use tracing::info;

/// Parsed command-line options
#[derive(Debug, Clone)]
struct Options {
    load: LoadConfig,
    bench_orders: u32,
    bench_items: u32,
    marker_path: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            load: LoadConfig::default(),
            bench_orders: 1_000,
            bench_items: 3,
            marker_path: PathBuf::from(DEFAULT_MARKER_FILE),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let options = match parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Usage: orderbench [--users N] [--products N] [--orders N] [--items-factor N] \
                 [--bench-orders N] [--bench-items N] [--marker PATH] [--seed N]"
            );
            std::process::exit(2);
        }
    };

    CliApp::new("orderbench").run(run_app(options)).await;
}

/// Parse and validate command-line arguments
fn parse_args(args: Vec<String>) -> Result<Options, AppError> {
    let mut options = Options::default();
    let mut iter = args.into_iter().skip(1);

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--users" => options.load.users = parse_value(&flag, iter.next())?,
            "--products" => options.load.products = parse_value(&flag, iter.next())?,
            "--orders" => options.load.orders = parse_value(&flag, iter.next())?,
            "--items-factor" => options.load.items_per_order = parse_value(&flag, iter.next())?,
            "--bench-orders" => options.bench_orders = parse_value(&flag, iter.next())?,
            "--bench-items" => options.bench_items = parse_value(&flag, iter.next())?,
            "--seed" => options.load.seed = Some(parse_value(&flag, iter.next())?),
            "--marker" => {
                let value = iter.next().ok_or_else(|| {
                    AppError::InvalidArguments(format!("{flag} requires a value"))
                })?;
                options.marker_path = PathBuf::from(value);
            }
            other => {
                return Err(AppError::InvalidArguments(format!("unknown flag: {other}")));
            }
        }
    }

    Ok(options)
}

fn parse_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, AppError> {
    let value =
        value.ok_or_else(|| AppError::InvalidArguments(format!("{flag} requires a value")))?;
    value
        .parse()
        .map_err(|_| AppError::InvalidArguments(format!("invalid value for {flag}: {value}")))
}

/// Main application logic: bootstrap the dataset in the background, warm
/// the key cache once the readiness signal fires, then run the four
/// insertion strategies back to back and print the comparison.
async fn run_app(options: Options) -> Result<(), AppError> {
    let store = Arc::new(MemoryOrderStore::new());
    let cache = Arc::new(KeyCache::new());
    let marker = FileMarker::new(options.marker_path);

    // The loader signals readiness instead of leaving the warm-up task to
    // poll for the marker
    let (ready_tx, mut ready_rx) = watch::channel(false);

    let loader = DatasetLoader::new(Arc::clone(&store), marker, options.load.clone());
    let bootstrap = tokio::spawn(async move {
        let outcome = loader.run().await?;
        let _ = ready_tx.send(true);
        Ok::<LoadOutcome, BootstrapError>(outcome)
    });

    let warm_store = Arc::clone(&store);
    let warm_cache = Arc::clone(&cache);
    let warmup = tokio::spawn(async move {
        // Wait for the one-shot readiness signal; if the loader died the
        // sender is gone and there is nothing to warm against
        loop {
            if *ready_rx.borrow_and_update() {
                break;
            }
            if ready_rx.changed().await.is_err() {
                return Err(CacheError::NotWarm);
            }
        }
        warm_cache.warm(&*warm_store)
    });

    match bootstrap.await?? {
        LoadOutcome::Skipped => info!("using previously generated dataset"),
        LoadOutcome::Completed { total_rows, .. } => info!(total_rows, "dataset freshly generated"),
    }
    warmup.await??;

    info!(
        users = store.user_count(),
        products = store.product_count(),
        orders = store.order_count(),
        order_items = store.order_item_count(),
        "store ready, running benchmarks"
    );

    // Strategies run back to back so the timings are not competing for
    // the same store
    let benchmark = InsertBenchmark::new(Arc::clone(&store), Arc::clone(&cache));
    let mut reports = Vec::new();
    for strategy in Strategy::all() {
        let benchmark = benchmark.clone();
        let (orders, items) = (options.bench_orders, options.bench_items);
        let report =
            tokio::task::spawn_blocking(move || benchmark.run(strategy, orders, items)).await??;
        reports.push(report);
    }

    println!("{:<26} {:>14} {:>12}", "strategy", "total records", "elapsed ms");
    for report in &reports {
        println!(
            "{:<26} {:>14} {:>12}",
            report.strategy, report.total_records, report.elapsed_ms
        );
    }

    Ok(())
}
