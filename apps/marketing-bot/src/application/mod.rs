//! Application Layer
//!
//! - **Ports**: YouTube, Gemini and Naver interfaces
//! - **Use Cases**: Crawl, screening and drafts, review, cafe sync
//! - **DTOs**: Commands and reports for the HTTP boundary
//! - **Prompts**: Gemini prompts and reply parsing

pub mod dto;
pub mod ports;
pub mod prompts;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
