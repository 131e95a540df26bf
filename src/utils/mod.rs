// Utility module exports

pub mod color;
pub mod date;
