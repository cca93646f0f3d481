//! UI composition and input routing for a 2D MMORPG client.
//!
//! The crate owns the window registry, focus, drag and tooltip state, key
//! translation and the top-level screen state machine. Rendering, audio,
//! networking and the game world are collaborators behind traits in
//! [`services`] and [`render`].

pub mod actions;
pub mod clipboard;
pub mod components;
pub mod constants;
pub mod cursor;
pub mod drivers;
pub mod elements;
pub mod event_loop;
pub mod geometry;
pub mod keybindings;
pub mod keys;
pub mod model;
pub mod render;
pub mod services;
pub mod settings;
pub mod states;
pub mod tracing_sub;
pub mod ui;

pub use ui::UiFacade;
