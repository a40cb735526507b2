#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of the `flag-resolve` binary.
//! It collects a base set of feature flags from positional operands and base
//! files, resolves it against the built-in legacy crypto rule table, and
//! prints the resulting flag set as preprocessor defines, a plain list, or
//! JSON.
//!
//! # Design
//!
//! [`run`] is the entry point. It accepts an iterator of arguments together
//! with handles for standard output and error so tests can drive it without
//! spawning a process. A [`clap`](https://docs.rs/clap/) builder command
//! parses the arguments into a `ParsedArgs` value; execution then loads
//! the base set (base files first, operands after, last entry per flag
//! wins), runs the [`resolver::Resolver`], and renders the result.
//!
//! # Invariants
//!
//! - `run` never panics; every failure maps to a documented exit code.
//! - Nothing is written to standard output unless resolution succeeds, so a
//!   failed run never leaves a partial configuration behind.
//! - Diagnostics go to the supplied error handle prefixed with
//!   `flag-resolve: error:`; tracing output goes to the process's standard
//!   error.
//!
//! # Errors
//!
//! | Exit code | Meaning |
//! |-----------|---------|
//! | [`EXIT_OK`] (0) | Success. |
//! | [`EXIT_USAGE`] (1) | Invalid arguments, unreadable base file, unknown flag, invalid table. |
//! | [`EXIT_NON_CONVERGENCE`] (2) | Resolution hit the pass limit. |
//! | [`EXIT_OUTPUT`] (3) | Writing the result failed. |
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(
//!     ["flag-resolve", "MBEDTLS_PK_PARSE_C", "MBEDTLS_ECP_C"],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(exit_code, 0);
//! let output = String::from_utf8(stdout).unwrap();
//! assert!(output.contains("#define MBEDTLS_PK_PARSE_EC_COMPRESSED\n"));
//! assert!(stderr.is_empty());
//! ```
//!
//! # See also
//!
//! - [`rules::catalogue`] for the rule table being applied.
//! - `src/bin/flag-resolve.rs` for the binary that wires [`run`] into `main`.

use std::ffi::OsString;
use std::io::Write;
use std::num::NonZeroUsize;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};
use resolver::{Resolver, ResolverConfig};
use rules::catalogue;

mod base;
mod error;
mod logging;
mod render;

pub use base::{BaseEntry, BaseError, Location};
pub use error::{CliError, EXIT_NON_CONVERGENCE, EXIT_OK, EXIT_OUTPUT, EXIT_USAGE};
pub use logging::LOG_ENV;
pub use render::{OutputFormat, RenderOptions};

/// Program name used in diagnostics.
const PROGRAM_NAME: &str = "flag-resolve";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Deterministic help text describing the supported options.
const HELP_TEXT: &str = concat!(
    "flag-resolve ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: flag-resolve [OPTIONS] [NAME[=VALUE]]...\n",
    "\n",
    "Resolves a base set of build-time feature flags against the legacy crypto\n",
    "rule table and prints every flag the base set implies. VALUE is one of\n",
    "1/0, on/off, true/false or yes/no; a bare NAME enables the flag. Later\n",
    "entries override earlier ones, and operands override base files.\n",
    "\n",
    "Options:\n",
    "  -f, --base-file FILE  Read base entries from FILE ('-' for standard input).\n",
    "                        Accepts NAME[=VALUE], '#define NAME' and '#undef NAME'.\n",
    "      --format FORMAT   Output format: defines (default), list or json.\n",
    "  -a, --all             Include inactive flags in the output.\n",
    "  -e, --explain         Annotate active flags with the rule that enabled them.\n",
    "      --list-rules      Print the rule table and exit.\n",
    "      --max-passes N    Give up after N passes over the rule table.\n",
    "  -v, --verbose         Trace table construction and resolution (repeatable).\n",
    "  -h, --help            Show this help message and exit.\n",
    "  -V, --version         Output version information and exit.\n",
    "\n",
    "Set FLAG_RESOLVE_LOG to a tracing filter directive to control diagnostics.\n",
    "\n",
    "Exit status: 0 success, 1 usage or configuration error,\n",
    "2 resolution did not converge, 3 output failure.\n",
);

/// Test-only access to the argument parser.
#[doc(hidden)]
pub mod test_utils {
    pub use crate::{ParsedArgs, parse_args};
}

/// Parsed command produced by [`parse_args`].
///
/// **Warning**: This type is exposed via `cli::test_utils` for integration
/// tests only. It is not part of the stable public API.
#[doc(hidden)]
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// `--help` was given.
    pub show_help: bool,
    /// `--version` was given.
    pub show_version: bool,
    /// `--list-rules` was given.
    pub list_rules: bool,
    /// Rendering switches.
    pub render: RenderOptions,
    /// `--max-passes` value.
    pub max_passes: Option<NonZeroUsize>,
    /// Number of `-v` occurrences.
    pub verbosity: u8,
    /// `--base-file` values in order.
    pub base_files: Vec<OsString>,
    /// Positional `NAME[=VALUE]` operands in order.
    pub operands: Vec<String>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .args_override_self(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base-file")
                .long("base-file")
                .short('f')
                .value_name("FILE")
                .help("Read base entries from FILE ('-' for standard input).")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format: defines, list or json.")
                .value_parser(OutputFormat::NAMES)
                .default_value("defines")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Include inactive flags in the output.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .short('e')
                .help("Annotate active flags with the rule that enabled them.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-rules")
                .long("list-rules")
                .help("Print the rule table and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-passes")
                .long("max-passes")
                .value_name("N")
                .help("Give up after N passes over the rule table.")
                .value_parser(parse_pass_limit)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Trace table construction and resolution (repeatable).")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("flags")
                .value_name("NAME[=VALUE]")
                .action(ArgAction::Append)
                .num_args(0..),
        )
}

fn parse_pass_limit(value: &str) -> Result<NonZeroUsize, String> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| format!("'{value}' is not a positive pass count"))
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
#[doc(hidden)]
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let format = matches
        .get_one::<String>("format")
        .and_then(|name| OutputFormat::from_name(name))
        .unwrap_or_default();
    let render = RenderOptions {
        format,
        all: matches.get_flag("all"),
        explain: matches.get_flag("explain"),
    };
    let base_files = matches
        .remove_many::<OsString>("base-file")
        .map(|values| values.collect())
        .unwrap_or_default();
    let operands = matches
        .remove_many::<String>("flags")
        .map(|values| values.collect())
        .unwrap_or_default();

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        list_rules: matches.get_flag("list-rules"),
        render,
        max_passes: matches.get_one::<NonZeroUsize>("max-passes").copied(),
        verbosity: matches.get_count("verbose"),
        base_files,
        operands,
    })
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the
/// caller.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{error}");
            EXIT_USAGE
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return write_static(stdout, HELP_TEXT);
    }

    if parsed.show_version {
        return write_static(
            stdout,
            concat!("flag-resolve ", env!("CARGO_PKG_VERSION"), "\n"),
        );
    }

    logging::init(parsed.verbosity);

    match drive(&parsed, stdout) {
        Ok(()) => EXIT_OK,
        Err(error) => {
            tracing::debug!(
                target: "flags::cli",
                exit_code = error.exit_code(),
                %error,
                "run_failed"
            );
            let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {error}");
            error.exit_code()
        }
    }
}

fn write_static<Out: Write>(stdout: &mut Out, text: &str) -> i32 {
    if stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()).is_err() {
        return EXIT_OUTPUT;
    }
    EXIT_OK
}

fn drive<Out: Write>(parsed: &ParsedArgs, stdout: &mut Out) -> Result<(), CliError> {
    let table = catalogue::legacy_crypto()?;

    if parsed.list_rules {
        render::render_rules(stdout, table)?;
        stdout.flush()?;
        return Ok(());
    }

    let base = collect_base(parsed)?;
    tracing::debug!(target: "flags::cli", entries = base.len(), "base_loaded");

    let config = parsed
        .max_passes
        .map_or_else(ResolverConfig::new, |limit| {
            ResolverConfig::new().with_pass_limit(limit)
        });
    let resolution = Resolver::with_config(table, config)
        .resolve(base.iter().map(|(name, enabled)| (name.as_str(), *enabled)))?;

    let mut rendered = Vec::new();
    render::render_resolution(&mut rendered, table, &resolution, parsed.render)?;
    stdout.write_all(&rendered)?;
    stdout.flush()?;
    Ok(())
}

/// Base files in order, then operands, so operands take precedence.
fn collect_base(parsed: &ParsedArgs) -> Result<Vec<BaseEntry>, CliError> {
    let mut entries = Vec::new();
    for path in &parsed.base_files {
        entries.extend(base::load_base_file(path)?);
    }
    entries.extend(base::parse_operands(&parsed.operands)?);
    Ok(entries)
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}

#[cfg(test)]
mod tests;
