use clap::Parser;
use ruletree_cli::{Cli, run};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();
    install_tracing(&cli.log);

    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn install_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_log_filter_falls_back_to_info() {
        install_tracing("ruletree=[unclosed");
        tracing::info!("Tracing installed");
    }
}
