//! Application Ports
//!
//! Driven ports implemented by infrastructure adapters.

mod email_sender_port;
mod event_publisher_port;
mod marketing_bot_port;

pub use email_sender_port::{
    EmailError, EmailMessage, EmailReceipt, EmailSenderPort, LogOnlyEmailSender,
};
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use marketing_bot_port::{AutoMissionSummary, MarketingBotError, MarketingBotPort};

#[cfg(test)]
pub use email_sender_port::MockEmailSenderPort;
#[cfg(test)]
pub use marketing_bot_port::MockMarketingBotPort;
