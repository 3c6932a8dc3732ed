//! RTF stream tool.
//!
//! Thin command-line surface over `rtf_codec`: dump a file's token stream,
//! re-serialize it (round-trip), or just check that it parses.

use std::fs::File;
use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Once;

use rtf_codec::{Reader, Writer};
use tracing::debug;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Only active when `RUST_LOG` is set, e.g. `RUST_LOG=rtf_codec=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "tokens" => tokens_command(&args[2]),
        "echo" => echo_command(&args[2]),
        "check" => check_command(&args[2]),
        other => {
            eprintln!("error: unknown command {other:?}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: rtfc <command> <file.rtf>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens <file>   Print the token stream, one token per line");
    eprintln!("  echo <file>     Parse and re-serialize the document to stdout");
    eprintln!("  check <file>    Parse the document, reporting the first error");
}

fn open(path: &str) -> Option<File> {
    match File::open(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("error: cannot open {path}: {err}");
            None
        }
    }
}

fn tokens_command(path: &str) -> ExitCode {
    let Some(file) = open(path) else {
        return ExitCode::FAILURE;
    };
    let mut reader = Reader::new(file);
    loop {
        match reader.next_token() {
            Ok(Some(token)) => println!("{token}"),
            Ok(None) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}

fn echo_command(path: &str) -> ExitCode {
    let Some(file) = open(path) else {
        return ExitCode::FAILURE;
    };
    let mut reader = Reader::new(file);
    let stdout = std::io::stdout();
    let mut writer = Writer::new(stdout.lock());

    loop {
        match reader.next_token() {
            Ok(Some(token)) => {
                if let Err(err) = writer.write_token(&token) {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
            Ok(None) => break,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut sink = writer.into_inner();
    if let Err(err) = sink.flush() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn check_command(path: &str) -> ExitCode {
    let Some(file) = open(path) else {
        return ExitCode::FAILURE;
    };
    let mut reader = Reader::new(file);
    let mut count: u64 = 0;
    loop {
        match reader.next_token() {
            Ok(Some(token)) => {
                debug!(%token, "read");
                count += 1;
            }
            Ok(None) => {
                println!("{path}: ok ({count} tokens, {} bytes)", reader.position());
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                eprintln!("{path}: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
