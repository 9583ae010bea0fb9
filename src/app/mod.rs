mod events;
mod render;
mod state;

// Re-export public types
pub use state::{App, PickedMentions, PopupRows, PopupView};

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
