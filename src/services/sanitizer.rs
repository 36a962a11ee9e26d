//! Post-processing for free-text model replies shown directly to students.
//!
//! Both transforms are best-effort string rewrites: they never fail and
//! return the input unchanged when there is nothing to rewrite.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MATH_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\(|\\\)|\\\[|\\\]").expect("MATH_DELIMITERS is a valid regex"));

static HAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\hat\{([^}]+)\}").expect("HAT is a valid regex"));

static VEC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\vec\{([^}]+)\}").expect("VEC is a valid regex"));

static SQRT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\sqrt\{([^}]+)\}").expect("SQRT is a valid regex"));

static FRAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\frac\{([^}]+)\}\{([^}]+)\}").expect("FRAC is a valid regex")
});

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([a-zA-Z]+)").expect("COMMAND is a valid regex"));

static LEADING_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•]+\s*").expect("LEADING_BULLET is a valid regex"));

/// Symbol commands rewritten to their Unicode glyph. Matched against the
/// whole command name, so `\cdots` never hits the `cdot` entry.
const SYMBOLS: &[(&str, &str)] = &[
    ("times", "×"),
    ("cdot", "·"),
    ("cdots", "…"),
    ("ldots", "…"),
    ("pm", "±"),
    ("leq", "≤"),
    ("le", "≤"),
    ("leqslant", "≤"),
    ("geq", "≥"),
    ("ge", "≥"),
    ("geqslant", "≥"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("approx", "≈"),
    ("theta", "θ"),
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("omega", "ω"),
    ("pi", "π"),
    ("Delta", "Δ"),
    ("infty", "∞"),
];

fn symbol_for(command: &str) -> Option<&'static str> {
    SYMBOLS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, glyph)| *glyph)
}

/// Rewrites LaTeX-style math markup into readable plain text.
///
/// Single-level groups only: `\sqrt{\frac{a}{b}}` does not resolve cleanly
/// because argument patterns stop at the first closing brace.
pub fn flatten_math(text: &str) -> String {
    let mut s = MATH_DELIMITERS.replace_all(text, "").into_owned();
    s = HAT.replace_all(&s, "${1}_hat").into_owned();
    s = VEC.replace_all(&s, "${1}_vec").into_owned();
    s = SQRT.replace_all(&s, "sqrt($1)").into_owned();
    s = FRAC.replace_all(&s, "($1)/($2)").into_owned();

    // Known symbols become glyphs; any other command just loses its backslash.
    s = COMMAND
        .replace_all(&s, |caps: &Captures| {
            symbol_for(&caps[1])
                .map(str::to_string)
                .unwrap_or_else(|| caps[1].to_string())
        })
        .into_owned();
    s.retain(|c| c != '{' && c != '}');
    s.trim().to_string()
}

/// Forces every non-blank line to start with `"- "`.
///
/// Lines are trimmed and blank lines dropped; a leading run of hyphens or
/// bullet glyphs is replaced rather than doubled.
pub fn enforce_bullets(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with("- ") {
                line.to_string()
            } else {
                format!("- {}", LEADING_BULLET.replace(line, ""))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full tutor post-processing: flatten math, then bullet every line.
pub fn sanitize_tutor_output(raw: &str) -> String {
    enforce_bullets(&flatten_math(raw))
}
