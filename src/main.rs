use clap::Parser;
use receipt_common::UploadController;
use receipt_scanner::{cli, config, error, offline, terminal, uploader};
use cli::{Cli, Commands};
use config::{process_receipt_url, Config};
use error::Result;
use offline::SavedResponse;
use std::io::IsTerminal;
use std::process::ExitCode;
use terminal::{write_outcome, TerminalView};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uploader::{HttpUploader, LocalFile};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(message) = e.user_message() {
                eprintln!("エラー: {}", message);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Upload { file, endpoint, output, format, lang } => {
            let locale = lang.unwrap_or(config.locale);
            let url = process_receipt_url(&config.resolve_endpoint(endpoint.as_deref()));
            let selected = file.as_deref().map(LocalFile::open).transpose()?;

            let controller = UploadController::new(
                TerminalView::new(std::io::stderr().is_terminal()),
                HttpUploader::new(url, config.timeout())?,
                locale.messages(),
            );
            info!(url = controller.uploader().url(), "upload target");

            controller.select_file(selected);
            let outcome = controller.submit().await;
            info!(success = outcome.is_success(), "upload finished");

            write_outcome(&outcome, controller.view(), format, output.as_deref(), locale.messages())?;
        }

        Commands::Render { input, output, format, lang } => {
            let locale = lang.unwrap_or(config.locale);
            let file = LocalFile::open(&input)?;
            let content = std::fs::read_to_string(&input)?;

            let controller = UploadController::new(
                TerminalView::new(false),
                SavedResponse::parse(&content),
                locale.messages(),
            );
            controller.select_file(Some(file));
            let outcome = controller.submit().await;

            write_outcome(&outcome, controller.view(), format, output.as_deref(), locale.messages())?;
        }

        Commands::Config { endpoint, lang, timeout, show } => {
            let mut config = config;
            let changed = endpoint.is_some() || lang.is_some() || timeout.is_some();

            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if let Some(lang) = lang {
                config.locale = lang;
            }
            if let Some(timeout) = timeout {
                config.timeout_seconds = (timeout > 0).then_some(timeout);
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  endpoint: {}", config.endpoint);
                println!("  upload URL: {}", process_receipt_url(&config.resolve_endpoint(None)));
                println!("  locale: {}", config.locale.as_str());
                match config.timeout() {
                    Some(t) => println!("  timeout: {}s", t.as_secs()),
                    None => println!("  timeout: none"),
                }
            }
        }
    }

    Ok(())
}
