//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the NVP client, configuration, and product catalog.

use pay_core::ProductCatalog;
use pay_paypal::PayPalClient;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for return/cancel callbacks
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Currency code used for every checkout
    pub currency: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// NVP client
    pub client: PayPalClient,
    /// Product catalog
    pub catalog: ProductCatalog,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        let client = PayPalClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PayPal client: {}", e))?;

        Ok(Self::with_parts(client, catalog, config))
    }

    /// Assemble state from already-built parts
    pub fn with_parts(client: PayPalClient, catalog: ProductCatalog, config: AppConfig) -> Self {
        Self {
            client,
            catalog,
            config,
        }
    }

    /// Return URL; the provider appends `token` and `PayerID`
    pub fn return_url(&self) -> String {
        format!("{}/checkout/success", self.config.base_url.trim_end_matches('/'))
    }

    /// Cancel URL
    pub fn cancel_url(&self) -> String {
        format!("{}/checkout/cancel", self.config.base_url.trim_end_matches('/'))
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_paypal::PayPalConfig;

    fn config(base_url: &str) -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: base_url.to_string(),
            environment: "test".to_string(),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let mut bad = config("http://localhost:3000");
        bad.host = "not a host".to_string();
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_callback_urls() {
        let client =
            PayPalClient::new(PayPalConfig::new("user", "pwd", "sig", true)).unwrap();
        let state = AppState::with_parts(
            client,
            ProductCatalog::new(),
            config("https://shop.example/"),
        );

        assert_eq!(state.return_url(), "https://shop.example/checkout/success");
        assert_eq!(state.cancel_url(), "https://shop.example/checkout/cancel");
        assert!(!state.config.is_production());
    }
}
