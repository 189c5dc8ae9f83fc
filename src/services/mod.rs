// Service module exports

pub mod classifier;
pub mod grid;
pub mod overlap;
pub mod projection;
pub mod render;
pub mod span;
