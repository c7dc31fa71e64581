//! # AWS IoT Thing Provisioner CLI
//!
//! Creates a thing, issues its certificate, stores the credentials, and
//! attaches the certificate to the thing and a policy.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: type FooType, policy FooPolicy, region eu-west-1
//! thing-provisioner
//!
//! # Custom type and policy
//! thing-provisioner --type SensorA --policy SensorPolicy
//!
//! # Extra attributes, JSON report
//! thing-provisioner --type SensorA -a room=kitchen -a floor=2 --json
//! ```
//!
//! AWS credentials are taken from the environment (env vars, profile,
//! instance role).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shared::{
    config::{parse_attribute, ProvisionerConfig},
    types::ProvisioningReport,
};
use thing_provisioner::{AwsIotClient, Provisioner};

#[derive(Parser, Debug)]
#[command(name = "thing-provisioner")]
#[command(about = "Provision an AWS IoT thing with a certificate and policy")]
#[command(version)]
struct Cli {
    /// Thing type [default: FooType]
    #[arg(long = "type", short = 't')]
    thing_type: Option<String>,

    /// Policy to attach the certificate to [default: FooPolicy]
    #[arg(long, short = 'p')]
    policy: Option<String>,

    /// AWS region [default: eu-west-1]
    #[arg(long)]
    region: Option<String>,

    /// Base directory for credential files [default: certificates]
    #[arg(long)]
    certificates_dir: Option<PathBuf>,

    /// Thing attribute as KEY=VALUE (repeatable, replaces the default set)
    #[arg(long = "attribute", short = 'a', value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Abort if the run takes longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    /// Overlay command-line flags on an environment-derived config
    fn apply(&self, mut config: ProvisionerConfig) -> ProvisionerConfig {
        if let Some(ref thing_type) = self.thing_type {
            config.thing_type = thing_type.clone();
        }
        if let Some(ref policy) = self.policy {
            config.policy_name = policy.clone();
        }
        if let Some(ref region) = self.region {
            config.region = region.clone();
        }
        if let Some(ref dir) = self.certificates_dir {
            config.certificates_dir = dir.clone();
        }
        if !self.attributes.is_empty() {
            config.attributes = self.attributes.iter().cloned().collect();
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    info!("thing-provisioner {}", shared::VERSION);

    let config = cli.apply(ProvisionerConfig::from_env().context("failed to load configuration")?);
    config.validate().context("invalid configuration")?;

    let api = Arc::new(AwsIotClient::new(&config).await);
    let provisioner = Provisioner::new(api, config);

    let report = provisioner.run_with_deadline().await?;

    print_report(&report, cli.json)
}

fn print_report(report: &ProvisioningReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("\n✓ Thing provisioned successfully!");
    println!("  Thing: {}", report.thing_name);
    if let Some(ref arn) = report.thing_arn {
        println!("  Thing ARN: {}", arn);
    }
    if let Some(ref id) = report.thing_id {
        println!("  Thing ID: {}", id);
    }
    println!("  Type: {}", report.thing_type);
    println!("  Certificate ID: {}", report.certificate_id);
    println!("  Certificate ARN: {}", report.certificate_arn);
    println!("  Policy: {}", report.policy_name);
    println!("  Credentials: {}", report.credential_dir.display());

    Ok(())
}
