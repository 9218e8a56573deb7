// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use hypertrend_app::{AppState, PortfolioSummary, ViewController, sample_holdings};
use hypertrend_db::Store;
use runtime::{DashboardRuntime, HoldingsSource};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `hypertrend --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_config = config.logging()?;
    logging::init_logging(&log_config)
        .context("initialize logging -- fix [log].path or unset HYPERTREND_LOG_LEVEL")?;
    logging::log_app_start(&log_config, &options.config_path);

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or HYPERTREND_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let holdings = if options.demo {
        HoldingsSource::Sample
    } else {
        HoldingsSource::from_path(config.holdings_path())
    };
    let holdings_sort = match &options.sort {
        Some(raw) => config::parse_sort(raw).context("--sort")?,
        None => config.default_sort()?,
    };

    if options.print_view {
        let rows = holdings.load()?;
        let mut controller = ViewController::new(rows, holdings_sort, config.items_per_page());
        if let Some(term) = &options.search {
            controller.set_search_term(term);
        }
        if let Some(page) = options.page {
            controller.set_page(page);
        }
        let summary = PortfolioSummary::from_holdings(controller.rows());
        println!("{}", hypertrend_tui::portfolio_summary_text(&summary));
        println!("{}", hypertrend_tui::render_plain_table(&controller));
        return Ok(());
    }

    let client = if config.api_enabled() {
        Some(
            hypertrend_api::Client::new(config.api_base_url(), config.api_timeout()?)
                .with_context(|| {
                    format!(
                        "invalid [api] config in {}; fix base_url/timeout values",
                        options.config_path.display()
                    )
                })?
                .with_token(config.api_token()),
        )
    } else {
        None
    };
    if options.check_only {
        let count = holdings.load()?.len();
        println!("ok: {count} holdings, database {}", db_path.display());
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = DashboardRuntime::new(
        &store,
        holdings,
        client,
        config.items_per_page(),
        holdings_sort,
    );
    hypertrend_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    print_view: bool,
    search: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        print_view: false,
        search: None,
        sort: None,
        page: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--print-view" => {
                options.print_view = true;
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a term"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--sort requires <column>[:asc|desc]"))?;
                options.sort = Some(value.as_ref().to_owned());
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a page number"))?;
                let page = value.as_ref().trim().parse::<i64>().map_err(|_| {
                    anyhow!("--page expects a whole number, got {:?}", value.as_ref())
                })?;
                options.page = Some(page);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if !options.print_view && (options.search.is_some() || options.page.is_some()) {
        bail!("--search and --page only apply with --print-view");
    }

    Ok(options)
}

fn print_help() {
    println!("hypertrend (portfolio dashboard)");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with sample holdings and an in-memory database");
    println!("  --check                  Validate config, database, and holdings source");
    println!("  --print-view             Print the holdings table instead of starting the TUI");
    println!("  --search <term>          Filter rows for --print-view");
    println!("  --sort <column[:dir]>    Sort rows, e.g. pnlPercent:desc");
    println!("  --page <n>               Page to print for --print-view");
    println!("  --help                   Show this help");
    println!();
    println!(
        "{} built-in sample holdings are used when [storage].holdings_path is unset.",
        sample_holdings().len()
    );
}

#[cfg(test)]
fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
