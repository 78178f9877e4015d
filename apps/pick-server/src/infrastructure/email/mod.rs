//! Email delivery adapters.

mod resend_client;

pub use resend_client::{FALLBACK_SENDER, RESEND_API_URL, ResendEmailSender, format_from_email};
