//! Line scanner that knows whether the current position is inside a string literal
//!
//! Cell markers and magic commands that appear inside a string (typically a
//! docstring) must not be counted when guessing the format of a script. The
//! scanner is fed one line at a time and reports whether the end of the last
//! line is still inside a string.
//!
//! Python strings delimited by a single quote character end with the line,
//! triple-quoted strings may span lines. R strings may span lines and have no
//! triple quotes. In both languages `#` starts a comment outside strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single(char),
    Triple(char),
}

#[derive(Debug, Clone)]
pub struct StringParser {
    python: bool,
    quote: Option<Quote>,
}

impl StringParser {
    /// A parser for the given language; anything but `R` follows Python rules
    pub fn new(language: &str) -> Self {
        StringParser {
            python: language != "R",
            quote: None,
        }
    }

    /// Whether the end of the last line read is inside a string
    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }

    pub fn read_line(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\\' {
                i += 2;
                continue;
            }

            match self.quote {
                Some(Quote::Single(q)) => {
                    if c == q {
                        self.quote = None;
                    }
                }
                Some(Quote::Triple(q)) => {
                    if is_triple(&chars, i, q) {
                        self.quote = None;
                        i += 3;
                        continue;
                    }
                }
                None => {
                    if c == '#' {
                        break;
                    }
                    if c == '"' || c == '\'' {
                        if self.python && is_triple(&chars, i, c) {
                            self.quote = Some(Quote::Triple(c));
                            i += 3;
                            continue;
                        }
                        self.quote = Some(Quote::Single(c));
                    }
                }
            }
            i += 1;
        }

        if self.python {
            if let Some(Quote::Single(_)) = self.quote {
                self.quote = None;
            }
        }
    }
}

fn is_triple(chars: &[char], i: usize, q: char) -> bool {
    chars.len() >= i + 3 && chars[i..i + 3].iter().all(|c| *c == q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted_after(language: &str, lines: &[&str]) -> Vec<bool> {
        let mut parser = StringParser::new(language);
        lines
            .iter()
            .map(|line| {
                parser.read_line(line);
                parser.is_quoted()
            })
            .collect()
    }

    #[test]
    fn test_long_string() {
        let lines = [
            "'''This is a multiline",
            "comment with \"quotes\", 'single quotes'",
            "# and comments",
            "and line breaks",
            "",
            "",
            "and it ends here'''",
            "",
            "",
            "1 + 1",
        ];
        assert_eq!(
            quoted_after("python", &lines),
            vec![true, true, true, true, true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_single_chars() {
        let lines = [
            "'This is a single line comment'''",
            "'and another one'",
            "# and comments",
            "\"and line breaks\"",
            "",
            "",
            "\"and it ends here'''\"",
            "",
            "",
            "1 + 1",
        ];
        assert!(quoted_after("python", &lines).iter().all(|quoted| !quoted));
    }

    #[test]
    fn test_long_string_with_four_quotes() {
        let lines = [
            "''''This is a multiline",
            "comment that starts with four quotes",
            "'''",
            "1 + 1",
        ];
        assert_eq!(quoted_after("python", &lines), vec![true, true, false, false]);
    }

    #[test]
    fn test_comment_hides_quotes() {
        assert_eq!(
            quoted_after("python", &["# it's a comment", "x = 1"]),
            vec![false, false]
        );
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(quoted_after("python", &[r#"x = "a \" b""#, "y"]), vec![false, false]);
        assert_eq!(quoted_after("python", &[r"x = '\'''", "'''"]), vec![false, true]);
    }

    #[test]
    fn test_r_strings_span_lines() {
        assert_eq!(
            quoted_after("R", &["x <- 'a string", "# %% still in the string", "end'", "# %%"]),
            vec![true, true, false, false]
        );
    }
}
