//! Comment conventions of the script languages that have a text representation

/// Language and line comment of a script extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLanguage {
    pub extension: &'static str,
    pub language: &'static str,
    pub comment: &'static str,
}

/// Script extensions, in the order their formats are registered.
pub const SCRIPT_EXTENSIONS: &[ScriptLanguage] = &[
    ScriptLanguage {
        extension: ".py",
        language: "python",
        comment: "#",
    },
    ScriptLanguage {
        extension: ".R",
        language: "R",
        comment: "#",
    },
    ScriptLanguage {
        extension: ".r",
        language: "R",
        comment: "#",
    },
    ScriptLanguage {
        extension: ".jl",
        language: "julia",
        comment: "#",
    },
    ScriptLanguage {
        extension: ".cpp",
        language: "c++",
        comment: "//",
    },
    ScriptLanguage {
        extension: ".ss",
        language: "scheme",
        comment: ";;",
    },
    ScriptLanguage {
        extension: ".clj",
        language: "clojure",
        comment: ";;",
    },
    ScriptLanguage {
        extension: ".scm",
        language: "scheme",
        comment: ";;",
    },
    ScriptLanguage {
        extension: ".sh",
        language: "bash",
        comment: "#",
    },
    ScriptLanguage {
        extension: ".q",
        language: "q",
        comment: "/",
    },
    ScriptLanguage {
        extension: ".m",
        language: "matlab",
        comment: "%",
    },
];

/// Look up the script language for an extension (with its leading dot)
pub fn script_language(extension: &str) -> Option<&'static ScriptLanguage> {
    SCRIPT_EXTENSIONS
        .iter()
        .find(|lang| lang.extension == extension)
}

/// Line comment for the extension. Unknown extensions default to `#`.
pub fn comment_for_extension(extension: &str) -> &'static str {
    script_language(extension)
        .map(|lang| lang.comment)
        .unwrap_or("#")
}

/// Header comment prefix: empty for the markdown flavours, the line comment otherwise
pub fn header_comment(extension: &str) -> &'static str {
    match extension {
        ".md" | ".Rmd" => "",
        other => comment_for_extension(other),
    }
}

/// Whether the extension belongs to the R language
pub fn is_r_extension(extension: &str) -> bool {
    matches!(extension, ".r" | ".R")
}

/// Keep only the final dotted suffix: `.pct.py` and `py` both become `.py`
pub fn normalize_extension(extension: &str) -> String {
    let last = extension.rsplit('.').next().unwrap_or(extension);
    format!(".{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lookup() {
        assert_eq!(comment_for_extension(".py"), "#");
        assert_eq!(comment_for_extension(".cpp"), "//");
        assert_eq!(comment_for_extension(".ss"), ";;");
        assert_eq!(comment_for_extension(".unknown"), "#");
    }

    #[test]
    fn test_header_comment() {
        assert_eq!(header_comment(".md"), "");
        assert_eq!(header_comment(".Rmd"), "");
        assert_eq!(header_comment(".R"), "#");
        assert_eq!(header_comment(".clj"), ";;");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".pct.py"), ".py");
        assert_eq!(normalize_extension("py"), ".py");
        assert_eq!(normalize_extension(".Rmd"), ".Rmd");
        assert_eq!(normalize_extension("lgt.R"), ".R");
    }

    #[test]
    fn test_script_extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for lang in SCRIPT_EXTENSIONS {
            assert!(seen.insert(lang.extension), "{} listed twice", lang.extension);
        }
    }
}
