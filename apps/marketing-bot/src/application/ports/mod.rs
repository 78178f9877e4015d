//! Application Ports
//!
//! Driven ports implemented by the YouTube, Gemini and Naver adapters.

mod cafe_search_port;
mod llm_port;
mod youtube_port;

pub use cafe_search_port::{CafeSearchPort, NaverError};
pub use llm_port::{GeminiError, LlmPort};
pub use youtube_port::{YouTubeError, YouTubePort};

#[cfg(test)]
pub use cafe_search_port::MockCafeSearchPort;
#[cfg(test)]
pub use llm_port::MockLlmPort;
#[cfg(test)]
pub use youtube_port::MockYouTubePort;
