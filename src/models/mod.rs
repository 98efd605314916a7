pub mod appointment;
pub mod catalog;
pub mod conversation;

pub use appointment::{Appointment, Field};
pub use catalog::ServiceCatalog;
pub use conversation::{Role, Turn};
