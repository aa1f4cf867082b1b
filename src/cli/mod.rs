pub mod args;
pub mod display;
pub mod terminal;

pub use terminal::*;
