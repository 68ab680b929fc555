//! REST transport layer.
//!
//! Everything above this module works with parsed JSON values; everything
//! below it is HTTP. See [`RestClient`] for the transport contract.

mod attachment;
mod client;
mod errors;

pub use attachment::{AttachmentContent, NewAttachment};
pub use client::RestClient;
pub use errors::{ResponseError, RestError};
