//! Show Catalog Bounded Context
//!
//! The fixed list of programs and genre categories missions belong to.

pub mod category;
pub mod show;

pub use category::{
    DEFAULT_CATEGORY_COLOR, ShowCategory, category_color, category_email_name, normalize_category,
};
pub use show::{Show, SHOWS, active_shows, normalize_show_id, show_by_id, show_by_name, shows_in};
