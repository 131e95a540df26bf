// Service module exports

pub mod calendar;
pub mod calendar_data;
pub mod daylight;
pub mod drag;
pub mod draft;
pub mod google;
pub mod layout;
pub mod location;
pub mod settings;
