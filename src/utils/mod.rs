pub mod clipboard;
pub mod params;
pub mod time;
