use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use rustyline::Result as RlResult;

use mintsh::display::{paint, Color};
use mintsh::{Outcome, Shell, ShellError};

use crate::prompt;

/// Run the interactive loop until `exit`/`quit` or end of input.
///
/// Every line is dispatched to completion before the next read; a command
/// that blocks holds the prompt until it returns or is cancelled. No error
/// from a command ever ends the loop.
pub(crate) fn run(shell: &mut Shell) -> RlResult<()> {
    let mut rl = DefaultEditor::new()?;

    println!(
        "{} ({}) - type 'help'",
        paint(Color::MintGreen, "mintsh"),
        std::env::consts::OS
    );

    loop {
        let readline = rl.readline(&prompt::render());
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                match shell.execute_line(&line) {
                    Ok(Outcome::Continue) => {}
                    Ok(Outcome::Exit) => break,
                    Err(err) => report(&err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C at the prompt just abandons the current line.
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    println!("{}", paint(Color::Gray, "Bye"));
    Ok(())
}

pub(crate) fn report(err: &ShellError) {
    let color = if err.is_warning() {
        Color::Yellow
    } else {
        Color::Red
    };
    eprintln!("{}", paint(color, &err.to_string()));
}
