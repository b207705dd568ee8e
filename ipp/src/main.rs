use std::io;
use std::process::ExitCode;

use clap::Parser;
use ippcode::{Engine, Error, InputStream};

/// Interprets an IPPcode23 program.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// XML program file. Defaults to standard input if --input is given.
    #[arg(long)]
    source: Option<String>,

    /// Input file read by READ. Defaults to standard input if --source is given.
    #[arg(long)]
    input: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Exit(code)) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    if cli.source.is_none() && cli.input.is_none() {
        return Err(Error::MissingArguments);
    }

    let (instructions, labels) = match &cli.source {
        Some(path) => ippcode_loader::load_from_path(path)?,
        None => {
            let text = read_stdin_to_string()?;
            ippcode_loader::load_from_str(&text)?
        }
    };

    let input = match &cli.input {
        Some(path) => InputStream::from_path(path)?,
        None => InputStream::from_stdin(),
    };

    let mut engine = Engine::new(instructions, labels, input, Box::new(io::stdout()));
    engine.run()
}

fn read_stdin_to_string() -> Result<String, Error> {
    use std::io::Read;
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|source| Error::InvalidFile {
            path: "<stdin>".to_string(),
            source,
        })?;
    Ok(text)
}
