//! Push-notification adapters.

mod fcm;
mod log_only;

pub use fcm::{FcmConfig, FcmNotificationSender};
pub use log_only::LogOnlyNotificationSender;
