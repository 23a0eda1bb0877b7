//! Fragment script envelope codec.

use crate::model::contribution::Contribution;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path};

const ENVELOPE_PREFIX: &str = "(function() {var implementors = ";
const ENVELOPE_SUFFIX: &str = ";if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()";

static PAYLOAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)var\s+implementors\s*=\s*(\{.*\})\s*;\s*if\s*\(\s*window\.register_implementors\s*\)")
        .expect("valid payload regex")
});
static TRAIT_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^trait\.([\p{XID_Start}_]\p{XID_Continue}*)\.js$")
        .expect("valid trait file regex")
});

/// Fragment decode and path errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    MissingEnvelope,
    MalformedPayload(String),
    NotATraitFragment(String),
}

impl Display for FragmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvelope => {
                write!(f, "fragment has no `var implementors = {{...}}` registration")
            }
            Self::MalformedPayload(message) => {
                write!(f, "fragment payload is not a valid implementors map: {message}")
            }
            Self::NotATraitFragment(path) => {
                write!(f, "path is not a trait implementors fragment: {path}")
            }
        }
    }
}

impl Error for FragmentError {}

/// Decodes the contribution a fragment script registers.
///
/// # Errors
/// - `MissingEnvelope` when the registration assignment/guard is absent.
/// - `MalformedPayload` when the object literal is not a library map.
pub fn decode_fragment(script: &str) -> Result<Contribution, FragmentError> {
    let payload = PAYLOAD_RE
        .captures(script)
        .and_then(|captures| captures.get(1))
        .ok_or(FragmentError::MissingEnvelope)?;

    serde_json::from_str(payload.as_str())
        .map_err(|err| FragmentError::MalformedPayload(err.to_string()))
}

/// Renders a contribution in the generator's envelope, one library per line.
pub fn render_fragment(contribution: &Contribution) -> String {
    let lines = contribution
        .iter()
        .map(|(library, entries)| {
            // String keys and JSON values have no failing serialization path.
            let key = serde_json::to_string(library.as_str()).expect("library key serializes");
            let value = serde_json::to_string(entries).expect("entry values serialize");
            format!("{key}:{value}")
        })
        .collect::<Vec<_>>();

    let body = if lines.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n}}", lines.join(",\n"))
    };
    format!("{ENVELOPE_PREFIX}{body}{ENVELOPE_SUFFIX}")
}

/// Maps `core/fmt/trait.Display.js` to `core::fmt::Display`.
///
/// `relative` must be relative to the `implementors/` directory.
pub fn trait_path_from_relative(relative: &Path) -> Result<String, FragmentError> {
    let not_trait = || FragmentError::NotATraitFragment(relative.display().to_string());

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str().ok_or_else(not_trait)?),
            _ => return Err(not_trait()),
        }
    }

    let file_name = segments.pop().ok_or_else(not_trait)?;
    let trait_name = TRAIT_FILE_RE
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .ok_or_else(not_trait)?;

    segments.push(trait_name.as_str());
    Ok(segments.join("::"))
}
