//! Identifiers of the marketing contexts.
//!
//! Time and error types are shared with the pick server.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use pick_server::domain::shared::{DomainError, Timestamp};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(VideoId, "YouTube video id.");
define_id!(ChannelId, "YouTube channel id.");
define_id!(DraftId, "Identifier of an AI mission draft.");
define_id!(CafePostId, "Document id of a stored Naver Cafe post.");
define_id!(ProgressId, "Identifier of a cafe crawl progress record.");

impl DraftId {
    /// Generate a fresh draft id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl CafePostId {
    /// Document id for a cafe article number.
    #[must_use]
    pub fn for_post(post_id: &str) -> Self {
        Self(format!("naver_cafe_{post_id}"))
    }
}

impl ProgressId {
    /// Progress id derived from the start time.
    #[must_use]
    pub fn for_start(started_at: Timestamp) -> Self {
        Self(format!(
            "naver_cafe_{}",
            started_at.as_datetime().timestamp_millis()
        ))
    }
}
