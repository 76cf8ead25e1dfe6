//! Output formatting for replies and admin views

pub mod console;
