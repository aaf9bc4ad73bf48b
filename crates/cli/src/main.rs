use clap::Parser;

use spendcast_cli::Cli;

fn main() {
    let cli = Cli::parse();
    spendcast_observability::init_with_default(if cli.verbose { "debug" } else { "info" });

    match spendcast_cli::run(&cli).and_then(|v| Ok(serde_json::to_string_pretty(&v)?)) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
