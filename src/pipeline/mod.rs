pub mod aliases;
pub mod build;
pub mod compiler;
pub mod cursor_types;
pub mod expander;
pub mod external;
pub mod rasterizer;
pub mod spec_loader;
pub mod theme_index;
pub mod win_writer;
pub mod xcursor_writer;
