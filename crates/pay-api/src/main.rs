//! # nvp-checkout
//!
//! Digital-goods checkout service on the PayPal NVP API.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_API_USERNAME=seller_api1.example.com
//! export PAYPAL_API_PASSWORD=...
//! export PAYPAL_API_SIGNATURE=...
//! export PAYPAL_SANDBOX=true
//!
//! # Run the server
//! nvp-checkout
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();
    let sandbox = state.client.config().use_sandbox;

    info!("nvp-checkout v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!("NVP endpoint: {}", state.client.config().endpoint());

    if is_prod && sandbox {
        warn!("Production environment is using the PayPal sandbox");
    }

    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/api/v1/checkout", addr);
        info!("Confirm:  POST http://{}/api/v1/checkout/confirm", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
