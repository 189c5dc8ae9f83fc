// Module exports for models

pub mod event;
pub mod grid;
pub mod settings;
pub mod timezone;
pub mod view_type;
