//! Asset pipeline for brochure sites.
//!
//! Minifies a site's stylesheet and script, points the HTML entry point at the
//! minified files and copies every other top-level file into the output
//! directory.

pub mod assets;
pub mod builder;

pub use assets::{AssetKind, AssetPipeline};
pub use builder::{
    copy_auxiliary_files, ensure_output_directory, BuildConfig, BuildError, BuildResult,
    StaticBuilder, DEFAULT_EXCLUSIONS,
};
