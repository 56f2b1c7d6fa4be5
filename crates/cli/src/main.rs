use std::process::ExitCode;

fn main() -> ExitCode {
    lookbook_cli::run()
}
