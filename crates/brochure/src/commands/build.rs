//! Site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brochure_static::{BuildConfig, BuildResult, StaticBuilder};
use serde::Deserialize;

/// Configuration file structure (brochure.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize)]
struct SiteConfig {
    #[serde(default = "default_source")]
    source: String,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
    /// Extra file names to keep out of the output
    #[serde(default)]
    exclude: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
            exclude: vec![],
        }
    }
}

fn default_source() -> String {
    ".".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub minify: Option<bool>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Merge the config file and command-line overrides into a build config.
///
/// When the config file sits in the source directory its name is excluded,
/// so it is never published.
fn resolve(file: Option<ConfigFile>, overrides: Overrides, config_path: &Path) -> BuildConfig {
    let loaded = file.is_some();
    let file = file.unwrap_or_default();

    let source_dir = overrides
        .source
        .unwrap_or_else(|| PathBuf::from(&file.site.source));
    let mut extra_exclusions = file.build.exclude;

    if loaded && is_inside(config_path, &source_dir) {
        if let Some(name) = config_path.file_name().and_then(|n| n.to_str()) {
            extra_exclusions.push(name.to_string());
        }
    }

    BuildConfig {
        source_dir,
        output_dir: overrides
            .output
            .unwrap_or_else(|| PathBuf::from(&file.site.output)),
        minify: overrides.minify.unwrap_or(file.build.minify),
        extra_exclusions,
    }
}

/// Whether `file` lives directly in `dir`.
fn is_inside(file: &Path, dir: &Path) -> bool {
    let (Ok(file), Ok(dir)) = (file.canonicalize(), dir.canonicalize()) else {
        return false;
    };
    file.parent() == Some(dir.as_path())
}

/// Load `config_path` and apply `overrides` on top of it.
pub fn resolve_config(config_path: &Path, overrides: Overrides) -> Result<BuildConfig> {
    let file_config = load_config(config_path)?;
    Ok(resolve(file_config, overrides, config_path))
}

/// Run the build command.
pub fn run(config_path: &Path, overrides: Overrides) -> Result<BuildResult> {
    tracing::info!("Building site...");

    let config = resolve_config(config_path, overrides)?;

    let result = StaticBuilder::new(config)
        .build()
        .context("Build failed")?;

    tracing::info!(
        "Wrote {} assets and copied {} files in {}ms",
        result.transformed.len(),
        result.copied.len(),
        result.duration_ms
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brochure.toml");

        let file = load_config(&path).unwrap();
        assert!(file.is_none());

        let config = resolve(file, Overrides::default(), &path);
        assert_eq!(config.source_dir, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert!(config.minify);
        assert!(config.extra_exclusions.is_empty());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brochure.toml");
        fs::write(&path, "[build]\nminify = false\n").unwrap();

        let file = load_config(&path).unwrap().unwrap();

        assert_eq!(file.site.source, ".");
        assert_eq!(file.site.output, "dist");
        assert!(!file.build.minify);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brochure.toml");
        fs::write(&path, "[site\noutput = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn overrides_win_over_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brochure.toml");
        fs::write(
            &path,
            "[site]\nsource = \"site\"\noutput = \"public\"\n\n[build]\nexclude = [\"notes.txt\"]\n",
        )
        .unwrap();

        let file = load_config(&path).unwrap();
        let config = resolve(
            file,
            Overrides {
                source: None,
                output: Some(PathBuf::from("out")),
                minify: Some(false),
            },
            &path,
        );

        assert_eq!(config.source_dir, PathBuf::from("site"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.minify);
        assert_eq!(config.extra_exclusions, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn config_in_source_dir_is_not_published() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brochure.toml");
        let out = temp.path().join("dist");
        fs::write(&path, "[build]\nminify = true\n").unwrap();
        fs::write(temp.path().join("favicon.ico"), "ico").unwrap();

        let result = run(
            &path,
            Overrides {
                source: Some(temp.path().to_path_buf()),
                output: Some(out.clone()),
                minify: None,
            },
        )
        .unwrap();

        assert_eq!(result.copied, vec!["favicon.ico".to_string()]);
        assert!(!out.join("brochure.toml").exists());
    }
}
