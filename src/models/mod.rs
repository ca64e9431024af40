pub mod appointment;
pub mod menu;
pub mod user;
pub mod vehicle;

pub use appointment::{Appointment, AppointmentStatus, TransitionError};
pub use menu::{default_menu, MenuItem, MenuSection};
pub use user::{PasswordReset, Role, User};
pub use vehicle::Vehicle;
