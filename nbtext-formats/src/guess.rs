//! Format detection from the content of a text notebook
//!
//! [`guess_format`] answers "which format is this file written in" when the
//! extension is known; [`divine_format`] also figures out the extension.
//! Both trust the header metadata first. Without it, scripts are scanned for
//! cell markers:
//!
//!     percent     `# %%` (or `#%%`) markers
//!     hydrogen    `# %%` markers and Jupyter magics like `%matplotlib inline`
//!     sphinx      at least two lines of twenty `#`, python only
//!     light       anything else
//!
//! Escaped magics like `# %%time` are not cell markers, and neither is
//! anything inside a string literal.

use crate::error::Result;
use crate::format_spec::{auto_ext_from_metadata, parse_many_value};
use crate::header::{extract_header, read_metadata};
use crate::languages::{normalize_extension, script_language, ScriptLanguage, SCRIPT_EXTENSIONS};
use crate::metadata::{self, Metadata, JUPYTEXT};
use crate::migrate::migrate;
use crate::registry::{FormatRegistry, AUTO_EXTENSION, NOTEBOOK_EXTENSION};
use crate::string_parser::StringParser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

const TWENTY_HASH: &str = "####################";

/// Keys of the `jupytext` block that do not pin a format
const NEUTRAL_JUPYTEXT_KEYS: &[&str] = &["encoding", "executable", "main_language"];

/// Comments tried in turn by [`divine_format`]
const DIVINATION_COMMENTS: &[&str] = &["", "#", "#'", ";;", "//"];

static MAGIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(%|%%|%%%)[a-zA-Z]").unwrap());

/// Cell marker patterns, one set per line comment
struct MarkerPatterns {
    comment: &'static str,
    double_percent: Regex,
    nbconvert: Regex,
}

impl MarkerPatterns {
    fn new(comment: &'static str) -> Self {
        let escaped = regex::escape(comment);
        MarkerPatterns {
            comment,
            double_percent: Regex::new(&format!(r"^{escaped}( %%|%%)(\s|$)")).unwrap(),
            nbconvert: Regex::new(&format!(r"^{escaped}( <codecell>| In\[[0-9 ]*\]:?)")).unwrap(),
        }
    }

    fn is_cell_marker(&self, line: &str) -> bool {
        self.double_percent.is_match(line) || self.nbconvert.is_match(line)
    }
}

static MARKERS: Lazy<Vec<MarkerPatterns>> = Lazy::new(|| {
    let mut markers: Vec<MarkerPatterns> = Vec::new();
    for lang in SCRIPT_EXTENSIONS {
        if !markers.iter().any(|m| m.comment == lang.comment) {
            markers.push(MarkerPatterns::new(lang.comment));
        }
    }
    markers
});

fn markers_for(comment: &str) -> Option<&'static MarkerPatterns> {
    MARKERS.iter().find(|m| m.comment == comment)
}

/// The format name recorded in the metadata for `extension`
///
/// Looked up in `jupytext.text_representation`, then in `jupytext.formats`
/// (or `default_formats` when the notebook has none). A suffixed extension
/// like `.lgt.py` first looks for the entry with that suffix, then for any
/// entry of the bare extension. When nothing matches, `explicit_default`
/// decides between the registry default for the extension and `None`.
/// Markdown flavours have no default name.
pub fn format_name_for_ext(
    metadata: &Metadata,
    extension: &str,
    default_formats: Option<&str>,
    explicit_default: bool,
) -> Result<Option<String>> {
    let bare = normalize_extension(extension);
    let suffixed = extension.trim_start_matches('.') != bare.trim_start_matches('.');

    if let (Some(repr_ext), Some(name)) = (
        metadata::text_representation_entry(metadata, "extension"),
        metadata::text_representation_entry(metadata, "format_name"),
    ) {
        let same_file = if suffixed {
            repr_ext == extension || repr_ext == bare
        } else {
            repr_ext.ends_with(&bare)
        };
        if same_file && !name.is_empty() {
            return Ok(Some(name));
        }
    }

    let auto_ext = auto_ext_from_metadata(metadata);
    let formats = match metadata::formats(metadata) {
        Some(Value::String(text)) if text.is_empty() => default_formats.map(Value::from),
        Some(Value::Null) | None => default_formats.map(Value::from),
        Some(formats) => Some(formats.clone()),
    };
    let specs = match formats {
        Some(formats) => parse_many_value(&formats)?,
        None => Vec::new(),
    };

    if suffixed {
        let exact = specs.iter().find(|spec| {
            spec.suffix
                .as_ref()
                .is_some_and(|suffix| extension.ends_with(&format!("{suffix}{}", spec.extension)))
        });
        if let Some(spec) = exact {
            if let Some(name) = spec.name() {
                return Ok(Some(name.to_string()));
            }
            return default_name(&bare, explicit_default);
        }
    }

    for spec in &specs {
        let matches = spec.extension == bare
            || (spec.extension == AUTO_EXTENSION && auto_ext.as_deref() == Some(bare.as_str()));
        if matches && (!explicit_default || spec.name().is_some()) {
            return Ok(spec.name().map(str::to_string));
        }
    }

    default_name(&bare, explicit_default)
}

fn default_name(extension: &str, explicit_default: bool) -> Result<Option<String>> {
    if !explicit_default || matches!(extension, ".md" | ".Rmd") {
        return Ok(None);
    }
    let name = FormatRegistry::global().default_format_name(extension)?;
    Ok(Some(name.to_string()))
}

/// The format of a text notebook, when its header alone pins it
pub fn read_format_from_metadata(text: &str, extension: &str) -> Result<Option<String>> {
    let mut metadata = read_metadata(text, extension)?;
    migrate(&mut metadata);
    format_name_for_ext(&metadata, extension, None, false)
}

fn pins_format(metadata: &Metadata) -> bool {
    let jupytext_pins = metadata::jupytext(metadata)
        .is_some_and(|block| block.keys().any(|k| !NEUTRAL_JUPYTEXT_KEYS.contains(&k.as_str())));
    jupytext_pins || metadata.keys().any(|k| k != JUPYTEXT)
}

/// Guess the format name of a text notebook with the given extension
///
/// A suffixed extension like `.pct.py` selects its own entry in the paired
/// formats of the header. The heuristics and the default only look at the
/// final suffix.
pub fn guess_format(text: &str, extension: &str) -> Result<String> {
    let registry = FormatRegistry::global();

    let mut metadata = read_metadata(text, extension)?;
    migrate(&mut metadata);

    let bare = normalize_extension(extension);
    if pins_format(&metadata) {
        if let Some(name) = format_name_for_ext(&metadata, extension, None, true)? {
            debug!(%extension, format = %name, "format given by the header");
            return Ok(name);
        }
    } else if let Some(lang) = script_language(&bare) {
        if let Some(name) = scan_script(text, lang) {
            return Ok(name.to_string());
        }
    }

    Ok(registry.default_format_name(&bare)?.to_string())
}

/// Count the cell markers of a script, outside of string literals
fn scan_script(text: &str, lang: &ScriptLanguage) -> Option<&'static str> {
    let markers = markers_for(lang.comment)?;
    let mut parser = StringParser::new(lang.language);

    let mut double_percent = 0;
    let mut magic_commands = 0;
    let mut twenty_hash = 0;

    for (number, line) in text.lines().enumerate() {
        parser.read_line(line);
        if parser.is_quoted() {
            continue;
        }

        if markers.is_cell_marker(line) {
            trace!(line = number + 1, "cell marker");
            double_percent += 1;
        }
        if MAGIC_RE.is_match(line) {
            trace!(line = number + 1, "magic command");
            magic_commands += 1;
        }
        if lang.extension == ".py" && line.starts_with(TWENTY_HASH) {
            twenty_hash += 1;
        }
    }

    debug!(
        extension = lang.extension,
        double_percent, magic_commands, twenty_hash, "script markers"
    );

    match (double_percent, magic_commands, twenty_hash) {
        (1.., 1.., _) => Some("hydrogen"),
        (1.., _, _) => Some("percent"),
        (_, _, 2..) => Some("sphinx"),
        _ => None,
    }
}

/// Guess both the extension and the format of a text, as `extension:format`
///
/// JSON notebooks are `ipynb`, and texts with a code fence and no header are
/// `md`. Anything else without a header is taken for a python script.
pub fn divine_format(text: &str) -> Result<String> {
    if let Ok(Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Ok(NOTEBOOK_EXTENSION.trim_start_matches('.').to_string());
    }

    let lines: Vec<&str> = text.lines().collect();
    for comment in DIVINATION_COMMENTS {
        let header = extract_header(&lines, comment)?;
        let extension = metadata::text_representation_entry(&header.metadata, "extension")
            .filter(|extension| !extension.is_empty());
        if let Some(extension) = extension {
            let name = guess_format(text, &extension)?;
            let extension = extension.strip_prefix('.').unwrap_or(extension.as_str());
            return Ok(format!("{extension}:{name}"));
        }
    }

    if lines.iter().any(|line| *line == "```") {
        return Ok("md".to_string());
    }

    Ok(format!("py:{}", guess_format(text, ".py")?))
}
