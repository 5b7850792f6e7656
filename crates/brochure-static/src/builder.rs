//! Static site builder.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use crate::assets::AssetKind;

/// Names that are never copied verbatim.
///
/// The first three are build-tool files, the rest are produced by
/// [`AssetKind`] transforms instead.
pub const DEFAULT_EXCLUSIONS: [&str; 6] = [
    "build.js",
    "package.json",
    "README.md",
    "styles.css",
    "script.js",
    "index.html",
];

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Flat source directory holding the site files
    pub source_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify the stylesheet and script
    pub minify: bool,

    /// File names to exclude on top of [`DEFAULT_EXCLUSIONS`]
    pub extra_exclusions: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("dist"),
            minify: true,
            extra_exclusions: vec![],
        }
    }
}

impl BuildConfig {
    /// Full exclusion set: the defaults plus any configured extras.
    pub fn exclusions(&self) -> BTreeSet<String> {
        DEFAULT_EXCLUSIONS
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_exclusions.iter().cloned())
            .collect()
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Transformed assets that were written, in build order
    pub transformed: Vec<AssetKind>,

    /// Auxiliary files copied verbatim, sorted by name
    pub copied: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to list source directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Output directory {} is the source directory", path.display())]
    OutputIsSource { path: PathBuf },
}

/// Create the output directory tree if it does not exist yet.
pub fn ensure_output_directory(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy every top-level file of `source_dir` whose name is not in
/// `exclusions` into `dest_dir`, byte for byte.
///
/// Subdirectories are ignored. Returns the copied names in sorted order.
pub fn copy_auxiliary_files(
    source_dir: &Path,
    dest_dir: &Path,
    exclusions: &BTreeSet<String>,
) -> Result<Vec<String>, BuildError> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| BuildError::ListDir {
            path: source_dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non UTF-8 file name: {}", entry.path().display());
            continue;
        };

        if exclusions.contains(name) {
            continue;
        }

        let to = dest_dir.join(name);
        fs::copy(entry.path(), &to).map_err(|source| BuildError::Copy {
            from: entry.path().to_path_buf(),
            to: to.clone(),
            source,
        })?;

        tracing::debug!("Copied {}", name);
        copied.push(name.to_string());
    }

    Ok(copied)
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the site.
    ///
    /// Steps run in a fixed order and stop at the first I/O error. Anything
    /// written before the failure stays on disk.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = &self.config.output_dir;

        ensure_output_directory(output_dir)?;
        self.check_distinct_dirs()?;

        let mut transformed = Vec::new();
        for kind in AssetKind::ALL {
            if self.process_asset(kind)? {
                transformed.push(kind);
            }
        }

        let copied =
            copy_auxiliary_files(&self.config.source_dir, output_dir, &self.config.exclusions())?;
        tracing::info!("{} auxiliary files copied", copied.len());

        tracing::info!("Build complete, output in {}", output_dir.display());

        Ok(BuildResult {
            transformed,
            copied,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Read, transform and write one asset. Returns `false` if the source
    /// file does not exist.
    fn process_asset(&self, kind: AssetKind) -> Result<bool, BuildError> {
        let source_path = self.config.source_dir.join(kind.source_name());
        if !source_path.is_file() {
            tracing::debug!("No {}, skipping", kind.source_name());
            return Ok(false);
        }

        let bytes = fs::read(&source_path).map_err(|source| BuildError::Read {
            path: source_path.clone(),
            source,
        })?;
        // Invalid UTF-8 becomes U+FFFD rather than failing the build.
        let source = String::from_utf8_lossy(&bytes);

        let output = kind.transform(&source, self.config.minify);

        let output_path = self.config.output_dir.join(kind.output_name());
        fs::write(&output_path, output).map_err(|source| BuildError::Write {
            path: output_path.clone(),
            source,
        })?;

        tracing::info!("{} written", output_path.display());
        Ok(true)
    }

    /// Refuse to build into the source directory, where copies would
    /// overwrite their own sources.
    fn check_distinct_dirs(&self) -> Result<(), BuildError> {
        let (Ok(source), Ok(output)) = (
            self.config.source_dir.canonicalize(),
            self.config.output_dir.canonicalize(),
        ) else {
            return Ok(());
        };

        if source == output {
            return Err(BuildError::OutputIsSource {
                path: self.config.output_dir.clone(),
            });
        }

        Ok(())
    }
}
