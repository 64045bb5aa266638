//! Render and collapse commit graphs on the command line.

use clap::Parser as _;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use revgraph_cli::{CliArgs, CliError};

fn main() {
    match CliArgs::parse() {
        CliArgs::Render(mut args) => {
            init_tracing(&args.input_args.verbose);
            exit_on_error(args.run(&mut std::io::stdout()));
        }
        CliArgs::Collapse(mut args) => {
            init_tracing(&args.input_args.verbose);
            exit_on_error(args.run(&mut std::io::stdout()));
        }
        CliArgs::External(_) => {
            // TODO: Implement support for external commands.
            // Running `revgraph COMMAND` would look for `revgraph-COMMAND`
            // in the path and run it.
            eprintln!("External commands are not supported yet.");
            std::process::exit(1);
        }
        _ => {
            eprintln!("Unknown command");
            std::process::exit(1);
        }
    };
}

fn init_tracing(verbosity: &Verbosity<InfoLevel>) {
    tracing_subscriber::fmt()
        .with_max_level(verbosity.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn exit_on_error(result: Result<(), CliError>) {
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
