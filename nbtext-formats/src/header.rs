//! Header block of text notebooks
//!
//! The notebook metadata of a text notebook is stored in a YAML front matter at
//! the top of the file. In scripts every line of the block is commented:
//!
//! ```text
//! #!/usr/bin/env python
//! # -*- coding: utf-8 -*-
//! # ---
//! # jupyter:
//! #   jupytext:
//! #     formats: ipynb,py:percent
//! # ---
//! ```
//!
//! In markdown documents the block is bounded by bare `---` lines. Only the
//! `jupyter:` section is notebook metadata; the other entries of the front
//! matter belong to the document and are handed back untouched. A shebang and
//! a PEP 263 coding line before the block are recorded as
//! `jupytext.executable` and `jupytext.encoding`.

use crate::error::{FormatError, Result};
use crate::languages::{header_comment, is_r_extension, normalize_extension};
use crate::metadata::{self, Metadata, TEXT_REPRESENTATION};
use crate::registry::FormatRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// Prefix of the header lines in knitr::spin scripts
pub const SPIN_HEADER_PREFIX: &str = "#'";

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^---\s*$").unwrap());
static JUPYTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^jupyter\s*:\s*$").unwrap());
static LEFTSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s").unwrap());
static BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*$").unwrap());
static CODING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"coding[:=][ \t]*([-_.a-zA-Z0-9]+)").unwrap());

/// Result of reading the header of a text notebook
#[derive(Debug, Clone, PartialEq)]
pub struct Header<'a> {
    /// Notebook metadata: the `jupyter` section, plus executable and encoding
    pub metadata: Metadata,
    /// Whether a complete `---` block was found
    pub had_header: bool,
    /// Front matter entries outside of the `jupyter` section, uncommented
    pub other_lines: Vec<String>,
    /// Number of lines consumed by the header, including the blank line after it
    pub header_lines: usize,
    /// The lines after the header
    pub body: &'a [&'a str],
}

fn uncomment_line<'l>(line: &'l str, prefix: &str) -> &'l str {
    if prefix.is_empty() {
        return line;
    }
    line.strip_prefix(prefix)
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .unwrap_or(line)
}

fn comment_line(line: &str, prefix: &str) -> String {
    match (prefix.is_empty(), line.is_empty()) {
        (true, _) => line.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix} {line}"),
    }
}

/// The coding declared by a PEP 263 line, if the line is one
fn declared_encoding<'l>(line: &'l str, comment: &str) -> Option<&'l str> {
    if comment.is_empty() {
        return None;
    }
    let rest = line
        .trim_start_matches([' ', '\t', '\x0c'])
        .strip_prefix(comment)?;
    CODING_RE
        .captures(rest)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Locate and parse the header block at the top of `lines`
///
/// `prefix` is the comment that starts every header line: empty for the
/// markdown flavours, the line comment of the language for scripts.
pub fn extract_header<'a>(lines: &'a [&'a str], prefix: &str) -> Result<Header<'a>> {
    let comment = if prefix == SPIN_HEADER_PREFIX { "#" } else { prefix };

    let mut metadata = Metadata::new();
    let mut jupyter = Vec::new();
    let mut other_lines = Vec::new();
    let mut in_jupyter = false;
    let mut start = 0;
    let mut end = None;

    for (i, line) in lines.iter().enumerate() {
        if i == 0 && !comment.is_empty() {
            if let Some(executable) = line.strip_prefix(&format!("{comment}!")) {
                metadata::jupytext_mut(&mut metadata)
                    .insert("executable".to_string(), json!(executable));
                start = i + 1;
                continue;
            }
        }

        let may_declare_encoding =
            i == 0 || (i == 1 && declared_encoding(lines[0], comment).is_none());
        if may_declare_encoding {
            if let Some(encoding) = declared_encoding(line, comment) {
                if encoding != "utf-8" {
                    return Err(FormatError::UnsupportedEncoding(encoding.to_string()));
                }
                metadata::jupytext_mut(&mut metadata)
                    .insert("encoding".to_string(), json!(line));
                start = i + 1;
                continue;
            }
        }

        if !line.starts_with(prefix) {
            break;
        }
        let line = uncomment_line(line, prefix);

        if i == start {
            if HEADER_RE.is_match(line) {
                continue;
            }
            break;
        }

        if HEADER_RE.is_match(line) {
            end = Some(i);
            break;
        }

        if JUPYTER_RE.is_match(line) {
            in_jupyter = true;
        } else if !line.is_empty() && !LEFTSPACE_RE.is_match(line) {
            in_jupyter = false;
        }

        if in_jupyter {
            jupyter.push(line);
        } else {
            other_lines.push(line.to_string());
        }
    }

    let Some(end) = end else {
        return Ok(Header {
            metadata,
            had_header: false,
            other_lines: Vec::new(),
            header_lines: start,
            body: &lines[start..],
        });
    };

    if !jupyter.is_empty() {
        let parsed: Value = serde_yaml::from_str(&jupyter.join("\n"))?;
        if let Some(Value::Object(section)) = parsed.get("jupyter") {
            merge_metadata(&mut metadata, section.clone());
        }
    }

    let mut header_lines = end + 1;
    if let Some(next) = lines.get(header_lines) {
        if BLANK_RE.is_match(uncomment_line(next, prefix)) {
            header_lines += 1;
        }
    }

    Ok(Header {
        metadata,
        had_header: true,
        other_lines,
        header_lines,
        body: &lines[header_lines..],
    })
}

/// Merge the parsed `jupyter` section into the metadata collected so far.
/// The `jupytext` blocks are merged key by key, the section wins on conflicts.
fn merge_metadata(metadata: &mut Metadata, section: Metadata) {
    for (key, value) in section {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (metadata.get_mut(&key), &value)
        {
            existing.extend(incoming.clone());
            continue;
        }
        metadata.insert(key, value);
    }
}

/// Notebook metadata found in the header of a text notebook
///
/// R scripts are also looked up with the spin `#'` prefix when there is no
/// `#` header.
pub fn read_metadata(text: &str, extension: &str) -> Result<Metadata> {
    let extension = normalize_extension(extension);
    let lines: Vec<&str> = text.lines().collect();

    let header = extract_header(&lines, header_comment(&extension))?;
    if is_r_extension(&extension) && !header.had_header {
        return Ok(extract_header(&lines, SPIN_HEADER_PREFIX)?.metadata);
    }
    Ok(header.metadata)
}

/// Render the header block for `metadata`, each line starting with `prefix`
///
/// The executable and encoding recorded in the metadata are written first, as
/// a shebang and a coding line. Nothing is produced when there is neither
/// metadata nor other front matter. [`extract_header`] reads back the same
/// metadata.
pub fn render_header(
    metadata: &Metadata,
    prefix: &str,
    other_lines: &[String],
) -> Result<Vec<String>> {
    let comment = if prefix == SPIN_HEADER_PREFIX { "#" } else { prefix };
    let mut metadata = metadata.clone();
    let mut lines = Vec::new();

    if let Some(Value::Object(block)) = metadata.get_mut(metadata::JUPYTEXT) {
        let executable = block.remove("executable");
        let encoding = block.remove("encoding");
        if let Some(executable) = executable.as_ref().and_then(Value::as_str) {
            if !comment.is_empty() {
                lines.push(format!("{comment}!{executable}"));
            }
        }
        if let Some(encoding) = encoding.as_ref().and_then(Value::as_str) {
            lines.push(encoding.to_string());
        }
        if block.is_empty() {
            metadata.remove(metadata::JUPYTEXT);
        }
    }

    let mut header: Vec<String> = other_lines.to_vec();
    if !metadata.is_empty() {
        let yaml = serde_yaml::to_string(&json!({ "jupyter": metadata }))?;
        header.extend(yaml.lines().map(str::to_string));
    }

    if !header.is_empty() {
        lines.push(comment_line("---", prefix));
        lines.extend(header.iter().map(|line| comment_line(line, prefix)));
        lines.push(comment_line("---", prefix));
    }

    Ok(lines)
}

/// Record in `jupytext.text_representation` the format the notebook is written in
///
/// The format version is the current version of the descriptor, and
/// `producer_version` the version of the program writing the file.
pub fn insert_text_representation(
    metadata: &mut Metadata,
    extension: &str,
    format_name: Option<&str>,
    producer_version: &str,
) -> Result<()> {
    let descriptor = FormatRegistry::global().lookup(extension, format_name)?;
    let representation = json!({
        "extension": extension,
        "format_name": descriptor.name(),
        "format_version": descriptor.current_version,
        "jupytext_version": producer_version,
    });
    metadata::jupytext_mut(metadata).insert(TEXT_REPRESENTATION.to_string(), representation);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_markdown_header() {
        let text = "---\njupyter:\n  jupytext:\n    formats: ipynb,md\n---\n\n# Title\n";
        let lines = lines(text);
        let header = extract_header(&lines, "").unwrap();
        assert!(header.had_header);
        assert_eq!(header.metadata["jupytext"]["formats"], "ipynb,md");
        assert_eq!(header.header_lines, 6);
        assert_eq!(header.body, &["# Title"]);
        assert!(header.other_lines.is_empty());
    }

    #[test]
    fn test_front_matter_outside_jupyter_section() {
        let text = "---\ntitle: Simple file\njupyter:\n  kernelspec:\n    name: python3\nauthor: me\n---\ntext";
        let lines = lines(text);
        let header = extract_header(&lines, "").unwrap();
        assert_eq!(header.other_lines, vec!["title: Simple file", "author: me"]);
        assert_eq!(header.metadata["kernelspec"]["name"], "python3");
        assert_eq!(header.body, &["text"]);
    }

    #[test]
    fn test_no_header() {
        let lines = lines("1 + 1\n---\n");
        let header = extract_header(&lines, "#").unwrap();
        assert!(!header.had_header);
        assert!(header.metadata.is_empty());
        assert_eq!(header.header_lines, 0);
        assert_eq!(header.body.len(), 2);
    }

    #[test]
    fn test_unterminated_header() {
        let lines = lines("# ---\n# jupyter:\n#   jupytext:\n");
        let header = extract_header(&lines, "#").unwrap();
        assert!(!header.had_header);
        assert!(header.metadata.is_empty());
        assert_eq!(header.body.len(), 3);
    }

    #[test]
    fn test_commented_header_with_executable_and_encoding() {
        let text = "#!/usr/bin/env python\n# -*- coding: utf-8 -*-\n# ---\n# jupyter:\n#   jupytext:\n#     formats: ipynb,py\n# ---\n\nx = 1\n";
        let lines = lines(text);
        let header = extract_header(&lines, "#").unwrap();
        assert!(header.had_header);
        assert_eq!(
            header.metadata["jupytext"],
            json!({
                "executable": "/usr/bin/env python",
                "encoding": "# -*- coding: utf-8 -*-",
                "formats": "ipynb,py"
            })
        );
        assert_eq!(header.body, &["x = 1"]);
    }

    #[test]
    fn test_executable_without_header() {
        let lines = lines("#!/bin/bash\necho 1\n");
        let header = extract_header(&lines, "#").unwrap();
        assert!(!header.had_header);
        assert_eq!(header.metadata["jupytext"]["executable"], "/bin/bash");
        assert_eq!(header.body, &["echo 1"]);
    }

    #[test]
    fn test_other_encodings_are_rejected() {
        let lines = lines("# -*- coding: latin-1 -*-\nx = 1\n");
        assert_eq!(
            extract_header(&lines, "#").unwrap_err(),
            FormatError::UnsupportedEncoding("latin-1".to_string())
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let lines = lines("# ---\n# jupyter:\n#   jupytext: [unclosed\n# ---\n");
        assert!(matches!(
            extract_header(&lines, "#"),
            Err(FormatError::Header(_))
        ));
    }

    #[test]
    fn test_read_metadata_spin_fallback() {
        let text = "#' ---\n#' jupyter:\n#'   jupytext:\n#'     formats: ipynb,R\n#' ---\n";
        let metadata = read_metadata(text, ".R").unwrap();
        assert_eq!(metadata["jupytext"]["formats"], "ipynb,R");

        let metadata = read_metadata(text, ".py").unwrap();
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_read_metadata_spin_header_after_shebang() {
        let text = "#!/usr/bin/env Rscript\n#' ---\n#' jupyter:\n#'   jupytext:\n#'     formats: ipynb,R:percent\n#' ---\n\nx <- 1\n";
        let metadata = read_metadata(text, ".R").unwrap();
        assert_eq!(metadata["jupytext"]["formats"], "ipynb,R:percent");
        assert_eq!(metadata["jupytext"]["executable"], "/usr/bin/env Rscript");
    }

    #[test]
    fn test_header_round_trip() {
        let metadata: Metadata = serde_json::from_value(json!({
            "jupytext": {
                "formats": "ipynb,py:percent",
                "text_representation": {
                    "extension": ".py",
                    "format_name": "percent",
                    "format_version": "1.2",
                    "jupytext_version": "1.0.0"
                }
            },
            "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}
        }))
        .unwrap();

        for prefix in ["", "#", "//", ";;"] {
            let rendered = render_header(&metadata, prefix, &[]).unwrap();
            let rendered: Vec<&str> = rendered.iter().map(String::as_str).collect();
            let header = extract_header(&rendered, prefix).unwrap();
            assert!(header.had_header);
            assert_eq!(header.metadata, metadata, "prefix {prefix:?}");
        }
    }

    #[test]
    fn test_render_header_snapshot() {
        let metadata: Metadata = serde_json::from_value(json!({
            "jupytext": {
                "executable": "/usr/bin/env python",
                "formats": "ipynb,py"
            },
            "kernelspec": {"name": "python3"}
        }))
        .unwrap();
        let rendered = render_header(&metadata, "#", &[]).unwrap().join("\n");
        insta::assert_snapshot!(rendered, @r"
        #!/usr/bin/env python
        # ---
        # jupyter:
        #   jupytext:
        #     formats: ipynb,py
        #   kernelspec:
        #     name: python3
        # ---
        ");
    }

    #[test]
    fn test_render_empty_header() {
        assert!(render_header(&Metadata::new(), "#", &[]).unwrap().is_empty());
        let other = vec!["title: A title".to_string()];
        assert_eq!(
            render_header(&Metadata::new(), "", &other).unwrap(),
            vec!["---", "title: A title", "---"]
        );
    }

    #[test]
    fn test_insert_text_representation() {
        let mut metadata = Metadata::new();
        insert_text_representation(&mut metadata, ".py", Some("percent"), "1.0.0").unwrap();
        assert_eq!(
            metadata["jupytext"]["text_representation"],
            json!({
                "extension": ".py",
                "format_name": "percent",
                "format_version": "1.2",
                "jupytext_version": "1.0.0"
            })
        );

        let mut metadata = Metadata::new();
        insert_text_representation(&mut metadata, ".md", None, "1.0.0").unwrap();
        assert_eq!(
            metadata["jupytext"]["text_representation"]["format_name"],
            "markdown"
        );
        assert!(insert_text_representation(&mut metadata, ".py", Some("nope"), "1.0.0").is_err());
    }
}
