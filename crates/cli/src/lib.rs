#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `ocdeflate` command-line front-end over the
//! [`deflate`] crate. It offers four subcommands: `compress`, `decompress`,
//! `adler32`, and `crc32`. Each reads one input (a file or standard input) and
//! writes its result to a file or standard output.
//!
//! # Design
//!
//! [`run`] accepts the argument list together with handles for standard output
//! and error, so tests drive the whole front-end in-process. A
//! [`clap`](https://docs.rs/clap/) builder command performs the parse. Options
//! omitted on the command line fall back to `OC_DEFLATE_LEVEL`,
//! `OC_DEFLATE_FORMAT`, and `OC_DEFLATE_MAX_OUTPUT`, then to the library
//! defaults. Diagnostics go through a `tracing-subscriber` stderr writer whose
//! filter follows `-v` or `RUST_LOG`.
//!
//! # Invariants
//!
//! - `run` never panics; failures are rendered as `ocdeflate: <message>` on
//!   stderr and mapped to a non-zero exit status.
//! - Output is written only after the whole operation succeeded.
//!
//! # Errors
//!
//! Exit statuses: `0` success, `1` usage or configuration, `2` malformed
//! compressed input, `3` I/O failure, `4` resource limit or allocation failure.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["ocdeflate", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```

mod env;
mod error;
mod logging;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command, error::ErrorKind, value_parser};
use deflate::checksum::{Adler32, Crc32};
use deflate::{
    CompressionLevel, Compressor, ContainerFormat, DEFAULT_MAX_OUTPUT, Decompressor, adler32,
    crc32,
};
use tracing::{debug, info};

pub use env::{FORMAT_VARIABLE, LEVEL_VARIABLE, MAX_OUTPUT_VARIABLE};
pub use error::{CliError, EXIT_BAD_DATA, EXIT_IO, EXIT_RESOURCE, EXIT_USAGE};

/// Name used in diagnostics and help output.
pub const PROGRAM_NAME: &str = "ocdeflate";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

const LOG_TARGET: &str = "ocdeflate";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ChecksumKind {
    Adler32,
    Crc32,
}

#[derive(Debug)]
enum Action {
    Compress {
        level: Option<String>,
        format: Option<String>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    },
    Decompress {
        format: Option<String>,
        max_output: Option<String>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    },
    Checksum {
        kind: ChecksumKind,
        seed: Option<i64>,
        input: Option<PathBuf>,
    },
}

#[derive(Debug)]
struct ParsedArgs {
    verbose: u8,
    action: Action,
}

fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("INPUT")
        .help("Input file; '-' or absent reads standard input.")
        .value_parser(value_parser!(PathBuf))
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_name("OUT")
        .help("Output file; '-' or absent writes standard output.")
        .value_parser(value_parser!(PathBuf))
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .value_name("FORMAT")
        .help("Container format: deflate, zlib, or gzip [env: OC_DEFLATE_FORMAT].")
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .value_name("N")
        .help("Running checksum to extend; reduced modulo 2^32.")
        .value_parser(value_parser!(i64))
        .allow_negative_numbers(true)
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress, decompress, and checksum data with libdeflate.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more detail.")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("compress")
                .about("Compress INPUT.")
                .arg(
                    Arg::new("level")
                        .long("level")
                        .short('l')
                        .value_name("LEVEL")
                        .help("Compression level 1-12 [env: OC_DEFLATE_LEVEL] [default: 6]."),
                )
                .arg(format_arg())
                .arg(output_arg())
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("decompress")
                .about("Decompress INPUT.")
                .arg(format_arg())
                .arg(
                    Arg::new("max-output")
                        .long("max-output")
                        .value_name("BYTES")
                        .help("Refuse to produce more than BYTES [env: OC_DEFLATE_MAX_OUTPUT]."),
                )
                .arg(output_arg())
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("adler32")
                .about("Print the Adler-32 checksum of INPUT.")
                .arg(seed_arg())
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("crc32")
                .about("Print the CRC-32 checksum of INPUT.")
                .arg(seed_arg())
                .arg(input_arg()),
        )
}

fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let matches = clap_command().try_get_matches_from(arguments.into_iter().map(Into::into))?;
    let verbose = matches.get_count("verbose");

    let string = |m: &ArgMatches, id: &str| m.get_one::<String>(id).cloned();
    let path = |m: &ArgMatches, id: &str| m.get_one::<PathBuf>(id).cloned();

    let action = match matches.subcommand() {
        Some(("compress", m)) => Action::Compress {
            level: string(m, "level"),
            format: string(m, "format"),
            input: path(m, "input"),
            output: path(m, "output"),
        },
        Some(("decompress", m)) => Action::Decompress {
            format: string(m, "format"),
            max_output: string(m, "max-output"),
            input: path(m, "input"),
            output: path(m, "output"),
        },
        Some((name, m)) => Action::Checksum {
            kind: if name == "adler32" {
                ChecksumKind::Adler32
            } else {
                ChecksumKind::Crc32
            },
            seed: m.get_one::<i64>("seed").copied(),
            input: path(m, "input"),
        },
        None => {
            return Err(clap_command().error(
                ErrorKind::MissingSubcommand,
                "a subcommand is required",
            ));
        }
    };

    Ok(ParsedArgs { verbose, action })
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code: `0` on success, otherwise one of
/// [`EXIT_USAGE`], [`EXIT_BAD_DATA`], [`EXIT_IO`], or [`EXIT_RESOURCE`].
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => return render_clap_error(&error, stdout, stderr),
    };

    logging::init_tracing(parsed.verbose);

    match execute(parsed.action, stdout) {
        Ok(()) => 0,
        Err(error) => {
            debug!(target: LOG_TARGET, code = error.exit_code(), "command failed");
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            error.exit_code()
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

fn render_clap_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(stdout, "{}", error.render()).is_err() {
                return EXIT_IO;
            }
            0
        }
        _ => {
            let error = CliError::Usage(error.render().to_string());
            let _ = write!(stderr, "{error}");
            error.exit_code()
        }
    }
}

fn execute<Out: Write>(action: Action, stdout: &mut Out) -> Result<(), CliError> {
    match action {
        Action::Compress {
            level,
            format,
            input,
            output,
        } => {
            let level = match level {
                Some(text) => text.parse::<CompressionLevel>()?,
                None => env::level_from_env(LEVEL_VARIABLE)?.unwrap_or_default(),
            };
            let format = resolve_format(format.as_deref())?;
            let data = read_input(input.as_deref())?;

            let mut compressor = Compressor::with_level(level)?;
            let compressed = compressor.compress(&data, format)?;
            info!(
                target: LOG_TARGET,
                %format,
                level = level.get(),
                input = data.len(),
                output = compressed.len(),
                "compressed"
            );
            write_output(output.as_deref(), &compressed, stdout)
        }
        Action::Decompress {
            format,
            max_output,
            input,
            output,
        } => {
            let format = resolve_format(format.as_deref())?;
            let limit = match max_output {
                Some(text) => parse_limit(&text)?,
                None => env::max_output_from_env(MAX_OUTPUT_VARIABLE)?.unwrap_or(DEFAULT_MAX_OUTPUT),
            };
            let data = read_input(input.as_deref())?;

            let mut decompressor = Decompressor::with_limit(limit)?;
            let restored = decompressor.decompress(&data, format)?;
            info!(
                target: LOG_TARGET,
                %format,
                input = data.len(),
                output = restored.len(),
                "decompressed"
            );
            write_output(output.as_deref(), &restored, stdout)
        }
        Action::Checksum { kind, seed, input } => {
            let value = checksum(kind, seed, input.as_deref())?;
            writeln!(stdout, "{value}").map_err(|source| CliError::write(None, source))
        }
    }
}

fn resolve_format(text: Option<&str>) -> Result<ContainerFormat, CliError> {
    match text {
        Some(text) => Ok(text.parse()?),
        None => Ok(env::format_from_env(FORMAT_VARIABLE)?.unwrap_or_default()),
    }
}

fn parse_limit(text: &str) -> Result<usize, CliError> {
    match text.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(CliError::InvalidLimit(text.to_owned())),
    }
}

fn checksum(kind: ChecksumKind, seed: Option<i64>, input: Option<&Path>) -> Result<u32, CliError> {
    let mut reader = open_input(input)?;
    let copied = match kind {
        ChecksumKind::Adler32 => {
            let mut state = Adler32::with_seed(adler32(None, seed));
            io::copy(&mut reader, &mut state).map(|_| state.value())
        }
        ChecksumKind::Crc32 => {
            let mut state = Crc32::with_seed(crc32(None, seed));
            io::copy(&mut reader, &mut state).map(|_| state.value())
        }
    };
    copied.map_err(|source| CliError::read(file_operand(input).map(Path::to_path_buf), source))
}

/// Treats `-` as the standard stream.
fn file_operand(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| *path != Path::new("-"))
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, CliError> {
    match file_operand(path) {
        Some(path) => File::open(path)
            .map(|file| Box::new(BufReader::new(file)) as Box<dyn Read>)
            .map_err(|source| CliError::read(Some(path.to_path_buf()), source)),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    let mut reader = open_input(path)?;
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|source| CliError::read(file_operand(path).map(Path::to_path_buf), source))?;
    Ok(data)
}

fn write_output<Out: Write>(
    path: Option<&Path>,
    bytes: &[u8],
    stdout: &mut Out,
) -> Result<(), CliError> {
    match file_operand(path) {
        Some(path) => {
            fs::write(path, bytes).map_err(|source| CliError::write(Some(path.to_path_buf()), source))
        }
        None => stdout
            .write_all(bytes)
            .and_then(|()| stdout.flush())
            .map_err(|source| CliError::write(None, source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with_args<I, S>(args: I) -> (i32, Vec<u8>, Vec<u8>)
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(args, &mut stdout, &mut stderr);
        (code, stdout, stderr)
    }

    #[test]
    fn command_definition_is_consistent() {
        clap_command().debug_assert();
    }

    #[test]
    fn version_flag_prints_package_version() {
        for flag in ["--version", "-V"] {
            let (code, stdout, stderr) = run_with_args([PROGRAM_NAME, flag]);
            assert_eq!(code, 0);
            assert!(stderr.is_empty());
            let text = String::from_utf8(stdout).expect("utf-8");
            assert!(text.contains(env!("CARGO_PKG_VERSION")));
        }
    }

    #[test]
    fn help_lists_every_subcommand() {
        let (code, stdout, stderr) = run_with_args([PROGRAM_NAME, "--help"]);
        assert_eq!(code, 0);
        assert!(stderr.is_empty());
        let text = String::from_utf8(stdout).expect("utf-8");
        for name in ["compress", "decompress", "adler32", "crc32"] {
            assert!(text.contains(name), "help should mention {name}");
        }
    }

    #[test]
    fn missing_subcommand_is_usage_error() {
        let (code, stdout, stderr) = run_with_args([PROGRAM_NAME]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }

    #[test]
    fn unknown_option_is_usage_error() {
        let (code, _, stderr) = run_with_args([PROGRAM_NAME, "compress", "--bogus"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(String::from_utf8_lossy(&stderr).contains("--bogus"));
    }

    #[test]
    fn verbose_count_and_negative_seed() {
        let parsed =
            parse_args([PROGRAM_NAME, "-vv", "crc32", "--seed", "-1"]).expect("parse");
        assert_eq!(parsed.verbose, 2);
        match parsed.action {
            Action::Checksum { kind, seed, input } => {
                assert_eq!(kind, ChecksumKind::Crc32);
                assert_eq!(seed, Some(-1));
                assert_eq!(input, None);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit("4096").expect("limit"), 4096);
        assert!(parse_limit("0").is_err());
        assert!(parse_limit("-5").is_err());
        assert!(parse_limit("big").is_err());
    }

    #[test]
    fn dash_means_standard_stream() {
        assert_eq!(file_operand(Some(Path::new("-"))), None);
        assert_eq!(file_operand(None), None);
        assert_eq!(
            file_operand(Some(Path::new("data.gz"))),
            Some(Path::new("data.gz"))
        );
    }

    #[test]
    fn exit_code_is_clamped() {
        assert_eq!(exit_code_from(0), std::process::ExitCode::SUCCESS);
        assert_eq!(exit_code_from(-3), std::process::ExitCode::SUCCESS);
        assert_eq!(exit_code_from(4), std::process::ExitCode::from(4));
        assert_eq!(exit_code_from(1000), std::process::ExitCode::from(255));
    }
}
