// Module exports for models

pub mod calendar;
pub mod daylight;
pub mod draft;
pub mod event;
pub mod settings;
pub mod view;
