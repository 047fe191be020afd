use attendance_api::cli::client::ClientError;
use attendance_api::cli::utils::output_error;
use attendance_api::cli::{Cli, OutputFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = attendance_api::cli::run(cli).await {
        let status = e.downcast_ref::<ClientError>().and_then(ClientError::status);
        match (&output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Json, _) => output_error(&output_format, &e.to_string(), status)?,
            (_, Ok("true")) | (_, Ok("1")) => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
