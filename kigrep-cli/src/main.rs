//! Binary entrypoint for kigrep-cli.

fn main() {
    if let Err(err) = kigrep_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
