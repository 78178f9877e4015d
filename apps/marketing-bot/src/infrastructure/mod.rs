//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `youtube/`: YouTube Data API client
//!   - `gemini/`: Gemini text generation client
//!   - `naver/`: Naver cafe search client
//!   - `persistence/`: In-memory repositories
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!   - `health/`: Health probes and Prometheus metrics
//!
//! - **Cross-cutting**
//!   - `config/`: YAML settings and dependency injection container
//!   - `metrics`: Counters and histograms

pub mod config;
pub mod gemini;
pub mod health;
pub mod http;
pub mod metrics;
pub mod naver;
pub(crate) mod outbound;
pub mod persistence;
pub mod youtube;
