//! Form rendering module
//!
//! - `field_renderer`: boxed field and help line primitives
//! - `intake_dialog`: the modal personnel intake dialog

mod field_renderer;
mod intake_dialog;

pub use intake_dialog::draw_intake_dialog;
