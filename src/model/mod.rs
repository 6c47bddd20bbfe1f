pub mod mapping;
pub mod scale;
pub mod spec;
pub mod theme;
