use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use newsdesk::cli::{Cli, Command};
use newsdesk::commands;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    newsdesk::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Decode(args) => commands::decode(args).context("decode")?,
        Command::Encode(args) => commands::encode(args).context("encode")?,
        Command::Preview(args) => commands::preview(args).context("preview")?,
        Command::List(args) => commands::list(args).await.context("list")?,
        Command::Show(args) => commands::show(args).await.context("show")?,
        Command::Save(args) => commands::save(args).await.context("save")?,
        Command::Delete(args) => commands::delete(args).await.context("delete")?,
    }

    Ok(())
}
