//! # paygate: Binary Entry Point
//!
//! Starts the Axum HTTP server. Provider credentials come from the
//! `PAYPAL_*` environment variables; server flags from the command line or
//! their `PAYGATE_*` equivalents.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use paygate_provider::{MockProvider, PaymentProvider, PaypalClient, ProviderConfig};
use paygate_web::state::AppState;
use tracing_subscriber::EnvFilter;

/// Which provider implementation serves the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    /// PayPal REST API, configured from `PAYPAL_*`.
    Live,
    /// Canned in-process responses; no network.
    Mock,
}

/// PayPal invoicing and subscriptions form gateway.
#[derive(Parser, Debug)]
#[command(name = "paygate", version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PAYGATE_PORT", default_value_t = 3000)]
    port: u16,

    /// Provider implementation.
    #[arg(long, env = "PAYGATE_PROVIDER", value_enum, default_value_t = ProviderKind::Live)]
    provider: ProviderKind,

    /// Emit logs as JSON lines.
    #[arg(long, env = "PAYGATE_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = ProviderConfig::from_env().context("invalid PAYPAL_* configuration")?;
    let provider: Arc<dyn PaymentProvider> = match cli.provider {
        ProviderKind::Live => {
            if !config.has_credentials() {
                tracing::warn!(
                    "PAYPAL_CLIENT_ID or PAYPAL_CLIENT_SECRET is empty; provider calls will fail"
                );
            }
            Arc::new(PaypalClient::new(&config).context("failed to build PayPal client")?)
        }
        ProviderKind::Mock => {
            tracing::info!("serving canned provider responses");
            Arc::new(MockProvider::new())
        }
    };
    tracing::info!(
        provider = provider.provider_name(),
        mode = %config.mode,
        base_url = %config.base_url,
        "provider configured"
    );

    let state = AppState::new(provider, config.mode).context("failed to load templates")?;
    let app = paygate_web::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!("paygate listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
