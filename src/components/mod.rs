//! UI components.

pub mod link_canvas;
