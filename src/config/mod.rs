pub mod args;
mod r#impl;
mod structs;
mod validators;

pub use args::{Args, Command};
pub use r#impl::init_config;
pub use structs::*;
