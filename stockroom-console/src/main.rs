//! Stockroom Console - terminal front end for the inventory backend
//!
//! Run: cargo run -p stockroom-console
//!      cargo run -p stockroom-console -- list --availability in_stock --sort unitPrice:desc

mod app;
mod cli;
mod format;
mod logger;
mod ui;
mod worker;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use stockroom_client::{
    ClientConfig, HttpClient, InventoryController, ProductService, Settlement,
};
use tokio::sync::mpsc;

use crate::app::{App, Message};
use crate::cli::{Cli, Command, ListArgs};
use crate::worker::Worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap's env fallbacks see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.base_url = api_url;
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config).await,
        Command::List(args) => run_list(config, args).await,
    }
}

async fn run_tui(config: ClientConfig) -> anyhow::Result<()> {
    let log_dir = std::env::var_os("STOCKROOM_LOG_DIR").map(PathBuf::from);
    let _guard = logger::init_tui(log_dir.as_deref());

    let http = config
        .build_http_client()
        .context("failed to create HTTP client")?;
    tracing::info!(base_url = %config.base_url, "using inventory backend");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::channel(64);
    let worker = Worker::new(ProductService::new(http), tx);
    let mut app = App::new(config.page_size);
    worker.dispatch(app.start());

    let res = run_app(&mut terminal, &mut app, &worker, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<H: HttpClient + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    worker: &Worker<H>,
    rx: &mut mpsc::Receiver<Message>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
            && let Some(command) = app.handle_key(key)
        {
            worker.dispatch(command);
        }

        // Drain worker results (non-blocking)
        while let Ok(message) = rx.try_recv() {
            if let Some(command) = app.handle_message(message) {
                worker.dispatch(command);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn run_list(config: ClientConfig, args: ListArgs) -> anyhow::Result<()> {
    logger::init_stderr();

    let http = config
        .build_http_client()
        .context("failed to create HTTP client")?;
    let mut controller = InventoryController::new(ProductService::new(http), config.page_size);

    let query = args.query(config.page_size)?;
    let mut settlement = controller.open(query).await;
    if settlement.is_applied() && args.page > 0 {
        settlement = controller.go_to_page(args.page).await;
    }
    if let Settlement::Failed(e) = settlement {
        return Err(e).context("failed to list products");
    }

    let state = controller.state();
    println!(
        "{:>6}  {:<5} {:<28} {:<16} {:>12} {:<12} {:>8}",
        "ID", "STOCK", "NAME", "CATEGORY", "UNIT PRICE", "EXPIRES", "IN STOCK"
    );
    for product in state.products() {
        println!(
            "{:>6}  {:<5} {:<28} {:<16} {:>12} {:<12} {:>8}",
            product.id,
            if product.is_in_stock() { "[x]" } else { "[ ]" },
            product.name,
            product.category,
            format::price(product.unit_price),
            format::date(product.expiration_date),
            product.in_stock
        );
    }
    println!("{}", format::pager(state.page()));

    if !state.metrics().is_empty() {
        println!();
        println!(
            "{:<16} {:>8} {:>14} {:>12}",
            "CATEGORY", "PRODUCTS", "TOTAL VALUE", "AVG PRICE"
        );
        for metric in state.metrics() {
            println!(
                "{:<16} {:>8} {:>14} {:>12}",
                metric.category,
                metric.product_count,
                format::price(metric.total_value),
                format::price(metric.average_price)
            );
        }
    }

    if let Some(error) = state.last_error() {
        tracing::warn!("{error}");
    }
    Ok(())
}
