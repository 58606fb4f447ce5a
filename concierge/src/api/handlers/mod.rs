pub mod chat;
pub mod health;
pub mod records;
pub mod reservations;

pub use chat::chat;
pub use health::{health_check, root};
pub use records::{list_catalog, list_reservations, list_rooms};
pub use reservations::create_reservation;
