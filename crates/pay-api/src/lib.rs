//! # pay-api
//!
//! HTTP API driving the NVP express-checkout flow.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints to start and confirm a digital-goods checkout
//! - Return/cancel landing pages for the buyer redirect
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/checkout` | SetExpressCheckout, returns approval URL |
//! | POST | `/api/v1/checkout/confirm` | DoExpressCheckoutPayment |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/checkout/success` | Return URL landing page |
//! | GET | `/checkout/cancel` | Cancel URL landing page |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
