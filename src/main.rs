use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;

mod actions;
mod client;
mod config;
mod error;
mod prompt;
mod space;

use client::KintoneClient;
use config::{Action, Args, Config};
use prompt::StdinConfirm;

#[tokio::main]
async fn main() {
    init_logging();

    // Usage errors exit 1 like every other validation failure; help and
    // version output keep clap's normal handling.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit();
        }
        Err(err) => {
            eprint!("{}", err.to_string().red());
            std::process::exit(1);
        }
    };

    let config = match Config::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&config).await {
        error::report(&err);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> error::Result<()> {
    let client = KintoneClient::new(config)?;
    let confirm = StdinConfirm;

    match config.action {
        Action::Show => {
            let space_id = config.space_id.as_deref().unwrap_or_default();
            actions::show_space(&client, config, space_id).await?;
        }
        Action::Create => {
            let new_space_id = actions::create_space(&client, config).await?;
            let name = config.space_name.as_deref().unwrap_or_default();
            println!("スペース「{name}」が正常に作成されました。ID: {new_space_id}");
        }
        Action::Update => {
            let space_id = config.space_id.as_deref().unwrap_or_default();
            actions::update_space(&client, config, &confirm, space_id).await?;
        }
        Action::Delete => {
            let space_id = config.space_id.as_deref().unwrap_or_default();
            actions::delete_space(&client, config, &confirm, space_id).await?;
        }
    }
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
