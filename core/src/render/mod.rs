//! Backend-independent draw commands for the polar scan view.

pub mod command;
pub mod scan_renderer;
pub mod surface;

pub use command::{DrawCommand, Rgba, Stroke};
pub use scan_renderer::{point_style, render};
pub use surface::RenderSurface;
