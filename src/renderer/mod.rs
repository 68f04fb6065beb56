//! Canvas2D rendering module
//!
//! Reads session state only; nothing here feeds back into the simulation.

pub mod canvas;

pub use canvas::CanvasRenderer;
