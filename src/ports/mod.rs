//! Ports: contracts between the application core and its collaborators.

mod notification_sender;
mod restaurant_lookup;
mod session_store;
mod user_directory;

pub use notification_sender::NotificationSender;
pub use restaurant_lookup::RestaurantLookup;
pub use session_store::SessionStore;
pub use user_directory::UserDirectory;
