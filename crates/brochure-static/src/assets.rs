//! Text transforms for the stylesheet, script and markup entry point.
//!
//! These are plain regex passes over the source text. Nothing is parsed, so
//! malformed input produces malformed (but deterministic) output and no
//! transform can fail.

use regex::Regex;
use std::sync::LazyLock;

/// Source name of the stylesheet.
pub const STYLESHEET_SOURCE: &str = "styles.css";
/// Output name of the minified stylesheet.
pub const STYLESHEET_OUTPUT: &str = "styles.min.css";
/// Source name of the script.
pub const SCRIPT_SOURCE: &str = "script.js";
/// Output name of the minified script.
pub const SCRIPT_OUTPUT: &str = "script.min.js";
/// Source (and output) name of the markup entry point.
pub const MARKUP_SOURCE: &str = "index.html";

/// Whitespace as browsers' script engines define it: ASCII blanks, the
/// Unicode space separators, the line terminators and the byte-order mark.
/// Unlike Rust's `\s` it has U+FEFF and lacks U+0085.
const WS_CLASS: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid block comment regex"));

// `\r`, U+2028 and U+2029 end a line comment too, not just `\n`.
static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//[^\n\r\x{2028}\x{2029}]*").expect("Invalid line comment regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{WS_CLASS}+")).expect("Invalid whitespace regex"));

static NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("Invalid newline regex"));

static CSS_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{WS_CLASS}*([{{:;,}}]){WS_CLASS}*")).expect("Invalid punctuation regex")
});

/// Trim the same characters `WS_CLASS` matches.
fn trim_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| {
        matches!(
            c,
            '\t' | '\n'
                | '\x0B'
                | '\x0C'
                | '\r'
                | ' '
                | '\u{A0}'
                | '\u{1680}'
                | '\u{2000}'..='\u{200A}'
                | '\u{2028}'
                | '\u{2029}'
                | '\u{202F}'
                | '\u{205F}'
                | '\u{3000}'
                | '\u{FEFF}'
        )
    })
}

/// The three source files the pipeline transforms instead of copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
    Markup,
}

impl AssetKind {
    /// All kinds, in the order a build processes them.
    pub const ALL: [AssetKind; 3] = [AssetKind::Stylesheet, AssetKind::Script, AssetKind::Markup];

    /// File name read from the source directory.
    pub fn source_name(self) -> &'static str {
        match self {
            AssetKind::Stylesheet => STYLESHEET_SOURCE,
            AssetKind::Script => SCRIPT_SOURCE,
            AssetKind::Markup => MARKUP_SOURCE,
        }
    }

    /// File name written to the output directory.
    pub fn output_name(self) -> &'static str {
        match self {
            AssetKind::Stylesheet => STYLESHEET_OUTPUT,
            AssetKind::Script => SCRIPT_OUTPUT,
            AssetKind::Markup => MARKUP_SOURCE,
        }
    }

    /// Apply this kind's transform.
    ///
    /// With `minify` off, the stylesheet and script pass through unchanged.
    /// Markup is always rewritten so it points at the output names.
    pub fn transform(self, source: &str, minify: bool) -> String {
        match self {
            AssetKind::Stylesheet if minify => AssetPipeline::minify_stylesheet(source),
            AssetKind::Script if minify => AssetPipeline::minify_script(source),
            AssetKind::Stylesheet | AssetKind::Script => source.to_string(),
            AssetKind::Markup => AssetPipeline::rewrite_markup(source),
        }
    }
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Minify a stylesheet.
    ///
    /// Strips `/* */` comments, collapses whitespace runs to a single space,
    /// drops whitespace around `{ } : ; ,` and trims the result.
    pub fn minify_stylesheet(css: &str) -> String {
        let css = BLOCK_COMMENT_RE.replace_all(css, "");
        let css = WHITESPACE_RE.replace_all(&css, " ");
        let css = CSS_PUNCT_RE.replace_all(&css, "$1");
        trim_whitespace(&css).to_string()
    }

    /// Minify a script.
    ///
    /// Strips `/* */` and `//` comments and folds all whitespace into single
    /// spaces. String and regex literals are not recognised, so a `//` inside
    /// a string literal truncates the rest of that line.
    pub fn minify_script(js: &str) -> String {
        let js = BLOCK_COMMENT_RE.replace_all(js, "");
        let js = LINE_COMMENT_RE.replace_all(&js, "");
        let js = NEWLINES_RE.replace_all(&js, " ");
        let js = WHITESPACE_RE.replace_all(&js, " ");
        trim_whitespace(&js).to_string()
    }

    /// Point the entry point's stylesheet and script references at the
    /// minified outputs.
    ///
    /// Only the exact attribute text is matched, so single quotes or extra
    /// path segments are left alone.
    pub fn rewrite_markup(html: &str) -> String {
        html.replace(
            &format!(r#"href="{STYLESHEET_SOURCE}""#),
            &format!(r#"href="{STYLESHEET_OUTPUT}""#),
        )
        .replace(
            &format!(r#"src="{SCRIPT_SOURCE}""#),
            &format!(r#"src="{SCRIPT_OUTPUT}""#),
        )
    }
}
