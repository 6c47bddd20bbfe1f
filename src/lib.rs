// Library exports for svg2xcur

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;

// Re-export the types most callers need
pub use config::BuildConfig;
pub use error::{BuildError, BuildResult};
pub use pipeline::build::{BuildReport, build, expand_only};
