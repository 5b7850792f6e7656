//! Scaffold a brochure site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `init`, in creation order.
const SCAFFOLD: [(&str, &str); 4] = [
    ("brochure.toml", DEFAULT_CONFIG),
    ("index.html", DEFAULT_INDEX),
    ("styles.css", DEFAULT_STYLES),
    ("script.js", DEFAULT_SCRIPT),
];

/// Run the init command in `dir`.
///
/// Existing files are left alone unless `yes` is set.
pub fn run(dir: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing site in {}", dir.display());

    for (name, content) in SCAFFOLD {
        let path = dir.join(name);
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", name);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", name))?;
        tracing::info!("Created {}", name);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'brochure build' to produce dist/.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Brochure Configuration

[site]
# Directory holding index.html, styles.css, script.js and other assets
source = "."

# Output directory for the built site
output = "dist"

[build]
# Minify styles.css and script.js
minify = true

# Extra top-level files to keep out of the output
exclude = []
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>My Company</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <header class="hero">
    <h1>My Company</h1>
    <p>We build things people like.</p>
    <button class="cta" data-target="contact">Get in touch</button>
  </header>

  <section id="contact">
    <h2>Contact</h2>
    <p>hello@example.com</p>
  </section>

  <script src="script.js"></script>
</body>
</html>
"#;

const DEFAULT_STYLES: &str = r#"/* Base */
* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
}

/* Hero */
.hero {
  padding: 4rem 2rem;
  text-align: center;
}

.cta {
  padding: 0.75rem 1.5rem;
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
}

section {
  padding: 2rem;
}
"#;

const DEFAULT_SCRIPT: &str = r#"/* Smooth scroll for call-to-action buttons */
document.querySelectorAll('.cta').forEach(function (button) {
  button.addEventListener('click', function () {
    // data-target names the section id
    var section = document.getElementById(button.dataset.target);
    if (section) {
      section.scrollIntoView({ behavior: 'smooth' });
    }
  });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_scaffold() {
        let temp = tempdir().unwrap();

        run(temp.path(), false).unwrap();

        for (name, content) in SCAFFOLD {
            assert_eq!(fs::read_to_string(temp.path().join(name)).unwrap(), content);
        }
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "mine").unwrap();

        run(temp.path(), false).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("index.html")).unwrap(),
            "mine"
        );
        assert!(temp.path().join("styles.css").exists());
    }

    #[test]
    fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "mine").unwrap();

        run(temp.path(), true).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("index.html")).unwrap(),
            DEFAULT_INDEX
        );
    }

    #[test]
    fn scaffold_builds_cleanly() {
        let temp = tempdir().unwrap();
        run(temp.path(), false).unwrap();

        let out = temp.path().join("dist");
        let result = brochure_static::StaticBuilder::new(brochure_static::BuildConfig {
            source_dir: temp.path().to_path_buf(),
            output_dir: out.clone(),
            extra_exclusions: vec!["brochure.toml".to_string()],
            ..Default::default()
        })
        .build()
        .unwrap();

        assert_eq!(result.transformed.len(), 3);
        assert!(result.copied.is_empty());
        let js = fs::read_to_string(out.join("script.min.js")).unwrap();
        assert!(!js.contains("data-target names"));
        assert!(!js.contains('\n'));
    }
}
