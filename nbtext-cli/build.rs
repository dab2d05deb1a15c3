use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs, without the help texts
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    let path = || {
        Arg::new("path")
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };
    let ext = || Arg::new("ext").long("ext").value_hint(ValueHint::Other);

    Command::new("nbtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting the text representations of Jupyter notebooks")
        .arg_required_else_help(true)
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
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(Command::new("guess").arg(path()).arg(ext()))
        .subcommand(Command::new("divine").arg(path()))
        .subcommand(
            Command::new("formats")
                .arg(Arg::new("spec").required(true).index(1))
                .arg(Arg::new("long").long("long").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("metadata")
                .arg(path())
                .arg(ext())
                .arg(Arg::new("header").long("header").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("check-version").arg(path()).arg(
                Arg::new("outputs")
                    .required(true)
                    .index(2)
                    .value_hint(ValueHint::FilePath),
            ),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "nbtext", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "nbtext", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "nbtext", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
