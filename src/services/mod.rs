pub mod access;
pub mod calendar;
pub mod credentials;
pub mod scheduling;
