use anyhow::Context;
use clap::Parser;
use tidyhaus_cms::cli::Cli;
use tidyhaus_cms::runner;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = real_main().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.validate().map_err(anyhow::Error::msg)?;
    runner::run(&cli)
        .await
        .with_context(|| format!("{} failed", command_name(&cli)))
}

fn command_name(cli: &Cli) -> &'static str {
    use tidyhaus_cms::cli::Command;
    match cli.command {
        Command::Serve(_) => "serve",
        Command::Init { .. } => "init",
        Command::Faq(_) => "faq",
        Command::Checklist(_) => "checklist",
        Command::Content(_) => "content",
    }
}
