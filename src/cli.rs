use mintsh::builtins::Builtin;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) help: bool,
    pub(crate) version: bool,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        command: None,
        help: false,
        version: false,
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-c" => {
                // Everything after -c is the command
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                }
                break;
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            _ => {}
        }
        i += 1;
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"mintsh {} - a tiny Mint-inspired interactive shell

USAGE:
    mintsh                  Start the interactive prompt
    mintsh -c <command>     Execute a single command line and exit
    mintsh --help           Show this help message
    mintsh --version        Show version

STARTUP:
    ~/.mintshrc             Executed line by line before the first prompt

BUILTINS:
    {}

    Any other first word is forwarded verbatim to the host's `sh`.
    Type `help` at the prompt for per-command summaries."#,
        VERSION,
        Builtin::NAMES.join(", ")
    );
}
