//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame, sidebar menu and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Light and dark palettes

pub mod input;
pub mod render;
pub mod styles;
