use std::process::ExitCode;

use mintsh::{signals, Outcome, Shell};

mod cli;
mod prompt;
mod rcfile;
mod repl;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let cli = cli::parse_args(&args);

    if cli.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        println!("mintsh {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    signals::install();
    let mut shell = Shell::new();

    // One-shot mode: no banner, no rc file, no prompt.
    if let Some(command) = cli.command {
        return match shell.execute_line(&command) {
            Ok(Outcome::Continue | Outcome::Exit) => ExitCode::SUCCESS,
            Err(err) => {
                repl::report(&err);
                ExitCode::FAILURE
            }
        };
    }

    rcfile::load_mintshrc(&mut shell);
    match repl::run(&mut shell) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
