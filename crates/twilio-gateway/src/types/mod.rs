//! Wire types for the Twilio messaging API.

mod send;
mod webhook;

pub(crate) use send::ApiErrorBody;
pub use send::{SendParams, SendResult};
pub use webhook::InboundWebhook;
