use anyhow::Context;
use aws_sdk_ec2::Client as Ec2Client;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rustami::aws_config::configure_aws;
use rustami::cli::Cli;
use rustami::{Ec2Compute, ReportAssembler, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rustami=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("Failed to read AWS settings")?;
    if let Some(account_id) = &settings.aws_account_id {
        tracing::info!(account_id = account_id.as_str(), "inventorying account");
    }

    let config = configure_aws(&settings, cli.region.clone(), cli.profile.as_deref()).await;
    tracing::info!(
        region = config.region().map(|r| r.as_ref()).unwrap_or("unset"),
        "loaded AWS configuration"
    );

    let compute = Ec2Compute::new(Ec2Client::new(&config));
    let report = ReportAssembler::new(&compute, cli.inventory_options())
        .build()
        .await
        .context("Failed to build the AMI inventory")?;

    let rendered = report
        .render(cli.render_style())
        .context("Failed to render the AMI inventory")?;
    println!("{rendered}");

    Ok(())
}
