//! Show categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback badge color for categories without a dedicated color.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// Genre bucket a show belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowCategory {
    /// Dating and romance shows.
    Love,
    /// Sports and survival competitions.
    Victory,
    /// Singing and audition programs.
    Star,
    /// Cross-category missions.
    Unified,
}

impl ShowCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Love, Self::Victory, Self::Star, Self::Unified];

    /// Canonical identifier (`LOVE`, `VICTORY`, ...).
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Love => "LOVE",
            Self::Victory => "VICTORY",
            Self::Star => "STAR",
            Self::Unified => "UNIFIED",
        }
    }

    /// English label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Love => "Romance",
            Self::Victory => "Survival",
            Self::Star => "Audition",
            Self::Unified => "Common",
        }
    }

    /// Korean description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Love => "로맨스",
            Self::Victory => "서바이벌",
            Self::Star => "오디션",
            Self::Unified => "공통",
        }
    }

    /// Badge color used in notification emails.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Love => "#F43F5E",
            Self::Victory => "#2563EB",
            Self::Star => "#EAB308",
            Self::Unified => DEFAULT_CATEGORY_COLOR,
        }
    }

    /// Name shown in emails. `UNIFIED` has no email name and keeps its id.
    #[must_use]
    pub const fn email_name(&self) -> &'static str {
        match self {
            Self::Love | Self::Victory | Self::Star => self.description(),
            Self::Unified => self.id(),
        }
    }
}

impl fmt::Display for ShowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Resolve a category id, Korean description or English label.
///
/// Ids match case-insensitively; descriptions and labels must match exactly.
#[must_use]
pub fn normalize_category(raw: &str) -> Option<ShowCategory> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    ShowCategory::ALL
        .into_iter()
        .find(|c| c.id() == upper)
        .or_else(|| {
            ShowCategory::ALL
                .into_iter()
                .find(|c| c.description() == trimmed || c.label() == trimmed)
        })
}

/// Email display name for a raw category string. Unknown values pass through.
#[must_use]
pub fn category_email_name(raw: &str) -> String {
    normalize_category(raw).map_or_else(|| raw.to_string(), |c| c.email_name().to_string())
}

/// Email badge color for a raw category string.
#[must_use]
pub fn category_color(raw: &str) -> &'static str {
    normalize_category(raw).map_or(DEFAULT_CATEGORY_COLOR, |c| c.color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("LOVE", Some(ShowCategory::Love); "id")]
    #[test_case("victory", Some(ShowCategory::Victory); "lowercase id")]
    #[test_case("오디션", Some(ShowCategory::Star); "korean description")]
    #[test_case("Common", Some(ShowCategory::Unified); "english label")]
    #[test_case("drama", None; "unknown")]
    #[test_case("  ", None; "blank")]
    fn normalizes(raw: &str, expected: Option<ShowCategory>) {
        assert_eq!(normalize_category(raw), expected);
    }

    #[test]
    fn email_names_and_colors() {
        assert_eq!(category_email_name("LOVE"), "로맨스");
        assert_eq!(category_email_name("UNIFIED"), "UNIFIED");
        assert_eq!(category_email_name("SPORTS"), "SPORTS");
        assert_eq!(category_color("STAR"), "#EAB308");
        assert_eq!(category_color("SPORTS"), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&ShowCategory::Victory).unwrap();
        assert_eq!(json, "\"VICTORY\"");
    }
}
