// Calendar Layout Library
// Grid layout engine for day, week and month calendar views

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{LayoutError, Result};
