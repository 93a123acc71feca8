//! Entry point for the `persona` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = persona_cli::run() {
        eprintln!("persona: {err}");
        std::process::exit(1);
    }
}
