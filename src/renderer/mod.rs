//! Canvas 2D rendering module
//!
//! Drawing is a pure function of `GameState`; nothing here feeds back into
//! the simulation.

pub mod palette;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
