//! Background execution of the intake form's requests

mod driver;

pub use driver::IntakeDriver;

#[cfg(test)]
pub use driver::apply_event;
