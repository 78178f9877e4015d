//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: In-memory repositories
//!   - `email/`: Resend email client
//!   - `marketing_bot/`: Marketing bot HTTP client
//!   - `events/`: Domain event logging
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers and cron endpoints
//!   - `health/`: Health probes and Prometheus metrics
//!
//! - **Cross-cutting**
//!   - `config/`: Settings and dependency injection container
//!   - `retry`: Backoff for outbound HTTP calls
//!   - `telemetry`, `metrics`: Tracing and metrics setup

pub mod config;
pub mod email;
pub mod events;
pub mod health;
pub mod http;
pub mod marketing_bot;
pub mod metrics;
pub mod persistence;
pub mod retry;
pub mod telemetry;
