// Command-line interface for nbtext
//
// This binary inspects the text representations of Jupyter notebooks: which
// format a file is written in, what its header metadata says, and whether it
// may safely overwrite the inputs of its paired notebook.
//
// The capabilities all live in the nbtext-formats crate, this binary reads
// files, prints results and maps errors to exit codes.
//
// Usage:
//  nbtext guess <path> [--ext <ext>]            - Format name of a text notebook
//  nbtext divine <path>                         - Extension and format, from the content only
//  nbtext formats <spec> [--long]               - Normalize a format list, or show its long form
//  nbtext metadata <path> [--ext <ext>] [--header] - Header metadata, migrated
//  nbtext check-version <source> <outputs>      - Exit 1 when source may not overwrite outputs
//  nbtext --list-formats                        - List registered formats
//
// Configuration:
//
// nbtext.toml in the working directory is layered over the built-in defaults
// when present, and --config <PATH> on top of that.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use commands::{extension_of, CommandResult};
use nbtext_config::{Loader, NbtextConfig};
use std::fs;
use std::path::Path;

fn build_cli() -> Command {
    Command::new("nbtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting the text representations of Jupyter notebooks")
        .long_about(
            "nbtext works with notebooks written as scripts or markdown documents.\n\n\
            Commands:\n  \
            - guess:         Format of a text notebook with a known extension\n  \
            - divine:        Extension and format, from the content alone\n  \
            - formats:       Normalize or expand a format list (e.g. 'ipynb,py:percent')\n  \
            - metadata:      Notebook metadata found in the header\n  \
            - check-version: Whether a text notebook may overwrite its paired notebook\n\n\
            Examples:\n  \
            nbtext guess notebook.py               # light, percent, hydrogen or sphinx\n  \
            nbtext divine notebook.txt             # e.g. py:percent\n  \
            nbtext formats ipynb,pct.py:percent --long\n  \
            nbtext metadata notebook.md --header   # Header block, as it would be written",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a nbtext.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("guess")
                .about("Guess the format of a text notebook")
                .long_about(
                    "Guess the format of a text notebook from its extension and content.\n\n\
                    A format named in the header always wins. Otherwise scripts are scanned\n\
                    for cell markers: '# %%' means percent, '# %%' and magics mean hydrogen,\n\
                    two lines of twenty '#' mean sphinx. Anything else gets the default\n\
                    format of the extension.",
                )
                .arg(path_arg("Path to the text notebook"))
                .arg(ext_arg()),
        )
        .subcommand(
            Command::new("divine")
                .about("Guess the extension and format of a text, as ext:format")
                .arg(path_arg("Path to the file")),
        )
        .subcommand(
            Command::new("formats")
                .about("Normalize a comma separated list of formats")
                .long_about(
                    "Parse and validate a list of formats in short form,\n\
                    [prefix/][suffix.]extension[:format_name], and print it back normalized.\n\n\
                    Examples:\n  \
                    nbtext formats ipynb,py:percent\n  \
                    nbtext formats ipynb,notebooks/.pct.py:percent --long",
                )
                .arg(
                    Arg::new("spec")
                        .help("Formats, e.g. 'ipynb,py:percent'")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("long")
                        .long("long")
                        .help("Print the long form, as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("metadata")
                .about("Print the notebook metadata found in the header")
                .arg(path_arg("Path to the text notebook"))
                .arg(ext_arg())
                .arg(
                    Arg::new("header")
                        .long("header")
                        .help("Render the header block instead of JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check-version")
                .about("Check that a text notebook may overwrite its paired notebook")
                .arg(path_arg("Path to the text notebook"))
                .arg(
                    Arg::new("outputs")
                        .help("Path to the paired notebook")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn ext_arg() -> Arg {
    Arg::new("ext")
        .long("ext")
        .value_name("EXT")
        .help("Extension to use instead of the one of the file (e.g. '.py')")
        .value_hint(ValueHint::Other)
}

fn main() {
    let matches = build_cli().get_matches();

    if matches.get_flag("list-formats") {
        print!("{}", commands::list_formats());
        return;
    }

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("guess", sub_matches)) => {
            let (text, extension) = read_notebook(sub_matches);
            let name = exit_on_error(
                nbtext_formats::guess_format(&text, &extension).map_err(Into::into),
            );
            println!("{name}");
        }
        Some(("divine", sub_matches)) => {
            let path = required(sub_matches, "path");
            let text = read_file(path);
            let format = exit_on_error(nbtext_formats::divine_format(&text).map_err(Into::into));
            println!("{format}");
        }
        Some(("formats", sub_matches)) => {
            let spec = required(sub_matches, "spec");
            let long = sub_matches.get_flag("long");
            println!("{}", exit_on_error(commands::formats(spec, long)));
        }
        Some(("metadata", sub_matches)) => {
            let (text, extension) = read_notebook(sub_matches);
            let output = if sub_matches.get_flag("header") {
                commands::metadata_header(&text, &extension, &config)
            } else {
                commands::metadata_json(&text, &extension)
            };
            println!("{}", exit_on_error(output));
        }
        Some(("check-version", sub_matches)) => {
            let source = required(sub_matches, "path");
            let outputs = required(sub_matches, "outputs");
            let text = read_file(source);
            exit_on_error(commands::check_version(
                &text,
                Path::new(source),
                Path::new(outputs),
                &config,
            ));
            println!("{source}: format version is compatible");
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(1);
        })
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Contents of the `path` argument, and the extension it is read with
fn read_notebook(matches: &ArgMatches) -> (String, String) {
    let path = required(matches, "path");
    let extension = match matches.get_one::<String>("ext") {
        Some(ext) if ext.starts_with('.') => ext.clone(),
        Some(ext) => format!(".{ext}"),
        None => extension_of(Path::new(path)).unwrap_or_else(|| {
            eprintln!("Error: '{path}' has no extension, please use --ext");
            std::process::exit(1);
        }),
    };
    (read_file(path), extension)
}

fn exit_on_error<T>(result: CommandResult<T>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn load_cli_config(explicit_path: Option<&str>) -> NbtextConfig {
    let loader = Loader::new().with_optional_file("nbtext.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn ext_flag_is_optional() {
        let matches = build_cli()
            .try_get_matches_from(["nbtext", "guess", "notebook.txt", "--ext", "py"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "guess");
        assert_eq!(sub.get_one::<String>("ext").map(String::as_str), Some("py"));
    }

    #[test]
    fn check_version_needs_both_paths() {
        assert!(build_cli()
            .try_get_matches_from(["nbtext", "check-version", "nb.py"])
            .is_err());
    }

    #[test]
    fn defaults_load_without_user_file() {
        let config = load_cli_config(None);
        assert!(config.version.check);
    }
}
