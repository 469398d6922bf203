use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bigtext::config::{usage, Config};
use bigtext::display::Display;
use bigtext::input::{initial_text, read_piped_stdin};
use bigtext::layout::{FontFamily, StaticMetrics, TextFitter};
use bigtext::render::TerminalSink;
use bigtext::routes::build_router;
use bigtext::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("bigtext", String::as_str);
    if args.len() == 2 && args[1] == "-h" {
        println!("{}", usage(program));
        return Ok(());
    }

    // A .env file may set RUST_LOG or BIGTEXT_CONF.
    dotenvy::dotenv().ok();

    // Logs go to stderr: the terminal sink draws on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, words) = Config::load(&args[1..])?;
    info!("Starting bigtext v{}", env!("CARGO_PKG_VERSION"));

    let stdin = if words.is_empty() {
        read_piped_stdin()?
    } else {
        None
    };
    let text = initial_text(&words, stdin, &config.text_file);

    if FontFamily::from_name(&config.typeface).is_none() {
        warn!(
            "No metrics for typeface '{}', using {}",
            config.typeface,
            bigtext::layout::font_metrics::DEFAULT_FAMILY.name()
        );
    }
    let params = config.fit_params();
    info!(
        width = params.area.width,
        height = params.area.height,
        min = %params.range.min(),
        max = %params.range.max(),
        "Display configured"
    );

    let fitter = TextFitter::new(params, StaticMetrics::new(config.dpi), config.typeface.clone());
    let sink = TerminalSink::new(std::io::stdout(), config.align, config.full_screen)
        .with_palette(config.palette());
    let mut display = Display::new(fitter, Box::new(sink), config.align);
    display
        .set_text(&text)
        .context("Display cannot show any text")?;

    let (fatal, fatal_rx) = watch::channel(false);
    let state = AppState {
        display: Arc::new(Mutex::new(display)),
        fatal: Arc::new(fatal),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;
    info!("Accepting text updates on http://{addr}/text");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal_rx.clone()))
        .await?;

    if *fatal_rx.borrow() {
        anyhow::bail!("failure: could not fit one character on screen");
    }
    Ok(())
}

/// Resolves on Ctrl-C or once a fit has failed terminally.
async fn shutdown_signal(mut fatal: watch::Receiver<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => info!("Shutting down"),
        _ = fatal.wait_for(|failed| *failed) => {
            error!("Display can no longer fit any text, shutting down");
        }
    }
}
