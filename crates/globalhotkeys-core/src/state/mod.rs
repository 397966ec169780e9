// Globalhotkeys State
// Pressed-key tracking owned by the hook delivery path

mod tracker;

pub use tracker::{InputTracker, PressedKeys};
