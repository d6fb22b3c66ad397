use clap::Parser;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CommandLine {
    /// Directory containing the vector icon source (defaults to the current
    /// directory)
    #[clap(index = 1, default_value = ".")]
    path: String,
}

pub fn main() -> ExitCode {
    // Parse command line options before we configure logging so a bad
    // invocation fails fast
    let command_line = CommandLine::parse();

    // Configure logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    iconcast::cli::cmd::generate::run(command_line.path)
}
