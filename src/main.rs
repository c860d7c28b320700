use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::runtime::Runtime;

use dex_viewer::{
    load_detail, logging, recompute, Catalogue, CatalogueSource, CatalogueView, Cli, Command, Config,
    OverlayView, PokeApiClient, SortCriterion,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let client = PokeApiClient::new(config.api_base_url.clone(), config.timeout)
        .context("failed to build HTTP client")?;

    match cli.command() {
        Command::Tui => run_ui_mode(&config, Arc::new(client), &runtime)?,
        Command::List { pages, query, sort } => {
            let _guard = logging::init_headless(config.log_file.as_deref());
            runtime.block_on(run_list(&config, &client, pages, &query, &sort))?;
        }
        Command::Show { id } => {
            let _guard = logging::init_headless(config.log_file.as_deref());
            runtime.block_on(run_show(&config, &client, id))?;
        }
    }

    Ok(())
}

async fn run_list(config: &Config, client: &PokeApiClient, pages: usize, query: &str, sort: &str) -> Result<()> {
    println!("📚 Loading catalogue from {}", client.base_url());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut catalogue = Catalogue::new(config.page_size);
    for _ in 0..pages {
        catalogue
            .fetch_next_page(client)
            .await
            .context(dex_viewer::render::LOAD_FAILED)?;
    }
    println!("✓ Loaded {} entries (next offset {})\n", catalogue.len(), catalogue.cursor().offset());

    let criterion = SortCriterion::parse(sort);
    let shown = recompute(catalogue.entries(), query, criterion);
    let view = CatalogueView::build(&shown, &config.image_base_url);

    for line in view.lines() {
        println!("{}", line);
    }

    Ok(())
}

async fn run_show(config: &Config, client: &PokeApiClient, id: u32) -> Result<()> {
    let detail = load_detail(client, id)
        .await
        .context(dex_viewer::render::OVERLAY_FAILED)?;

    for line in OverlayView::build(&detail, &config.image_base_url).lines() {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config, source: Arc<dyn CatalogueSource>, runtime: &Runtime) -> Result<()> {
    let _guard = logging::init_tui(config.log_file.as_deref());

    let mut app = dex_viewer::ui::App::new(config.page_size, config.image_base_url.clone());
    dex_viewer::ui::run_ui(&mut app, source, runtime.handle().clone())?;

    println!("✅ Viewed {} entries", app.catalogue.len());

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config, _source: Arc<dyn CatalogueSource>, _runtime: &Runtime) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: dex-viewer list / dex-viewer show <ID>");
    std::process::exit(1);
}
