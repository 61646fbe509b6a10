//! Firebase Cloud Messaging client: service-account credential exchange and
//! per-device message dispatch.

pub mod credential;
pub mod dispatcher;
pub mod error;
pub mod message;

pub use credential::{CredentialSigner, ServiceAccount, ServiceAccountConfig};
pub use dispatcher::Dispatcher;
pub use error::FcmError;
pub use message::Notification;
