use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use azmgmt::config::{Config, SettingOverride};
use azmgmt::deployment::{apply_settings, SwapOutcome};
use azmgmt::document::{self, Document};
use azmgmt::operation::format_result;
use azmgmt::{
    CertificateStore, ConfigManager, HostedServiceClient, OperationPoller, OperationStatus,
    OperationStatusFetcher, RequestExecutor, ReqwestTransport,
};

#[derive(Parser)]
#[command(name = "azmgmt")]
#[command(about = "Inspect and change hosted services through the Service Management API")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config/azmgmt.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the status of an operation once
    Status {
        /// Request id returned by the mutating call
        operation_id: String,
    },

    /// Poll an operation until it finishes or the timeout passes
    Poll {
        operation_id: String,

        /// Seconds between status checks (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Seconds before giving up (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the service configuration of a deployment slot
    GetConfig {
        /// Service key from the config file
        service: String,

        #[arg(long, default_value = "production")]
        slot: String,

        /// Also write the configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite role settings and post the new configuration
    UpdateConfig {
        service: String,

        #[arg(long, default_value = "production")]
        slot: String,

        /// NAME=VALUE, repeatable; defaults to the settings listed in the config file
        #[arg(long = "set", value_parser = parse_setting)]
        settings: Vec<SettingOverride>,

        /// Return after the request is accepted instead of polling it
        #[arg(long)]
        no_wait: bool,
    },

    /// Swap the staging deployment into production
    Swap {
        service: String,

        #[arg(long)]
        no_wait: bool,
    },

    /// List the public input endpoints of a service
    Endpoints { service: String },
}

fn parse_setting(raw: &str) -> std::result::Result<SettingOverride, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    if name.trim().is_empty() {
        return Err(format!("setting name is empty in '{}'", raw));
    }
    Ok(SettingOverride {
        name: name.trim().to_string(),
        value: value.to_string(),
    })
}

/// How a command ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Nothing was polled
    Done,
    /// A mutation was accepted and left running (`--no-wait`)
    Accepted,
    /// An operation was polled to a terminal status
    Polled(OperationStatus),
}

impl Outcome {
    fn exit_code(self) -> i32 {
        match self {
            Outcome::Done | Outcome::Accepted => 0,
            Outcome::Polled(OperationStatus::Succeeded) => 0,
            Outcome::Polled(_) => 2,
        }
    }
}

/// Everything a command needs, built once from the config
struct App {
    config: Arc<Config>,
    executor: RequestExecutor,
}

impl App {
    fn new(config: Arc<Config>) -> Result<Self> {
        let store = CertificateStore::new(config.certificate_paths.clone());
        let credential = store
            .find_by_thumbprint(&config.certificate_thumbprint)
            .context("Client certificate lookup failed")?;
        let transport = ReqwestTransport::new(&credential, config.api.request_timeout())?;
        let executor = RequestExecutor::new(Arc::new(transport), config.api.settings());
        Ok(Self { config, executor })
    }

    fn poller(&self, subscription_id: &str) -> OperationPoller {
        OperationPoller::new(
            OperationStatusFetcher::new(self.executor.clone()),
            subscription_id,
        )
    }

    fn service(&self, key: &str) -> Result<(String, HostedServiceClient)> {
        let service = self.config.service(key)?;
        let subscription_id = self.config.subscription_for(service);
        Ok((
            service.name.clone(),
            HostedServiceClient::new(self.executor.clone(), subscription_id),
        ))
    }

    /// Poll `request_id` with the configured interval and print the outcome
    async fn wait(&self, subscription_id: &str, request_id: &str) -> Result<Outcome> {
        if request_id.is_empty() {
            return Err(anyhow!("The service did not return an x-ms-request-id to poll"));
        }
        let result = self
            .poller(subscription_id)
            .poll(
                request_id,
                self.config.polling.interval(),
                self.config.polling.timeout(),
            )
            .await?;
        println!("{}", format_result(&result, request_id));
        Ok(Outcome::Polled(result.status))
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config_manager = ConfigManager::new(&cli.config).await?;
    let context = App::new(config_manager.get_current_config())?;
    let default_subscription = context.config.subscription_id.clone();

    match cli.command {
        Commands::Status { operation_id } => {
            let fetcher = OperationStatusFetcher::new(context.executor.clone());
            let status = fetcher
                .fetch_status(&default_subscription, &operation_id)
                .await?;
            println!("{}", Document::new(status.operation));
            Ok(Outcome::Done)
        }

        Commands::Poll {
            operation_id,
            interval,
            timeout,
            json,
        } => {
            let polling = &context.config.polling;
            let result = context
                .poller(&default_subscription)
                .poll_secs(
                    &operation_id,
                    interval.unwrap_or(polling.interval_seconds),
                    timeout.unwrap_or(polling.timeout_seconds),
                )
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format_result(&result, &operation_id));
            }
            Ok(Outcome::Polled(result.status))
        }

        Commands::GetConfig {
            service,
            slot,
            output,
        } => {
            let (name, client) = context.service(&service)?;
            let properties = client.properties(&name).await?;
            let configuration = properties.slot_configuration(&slot)?;
            let pretty = Document::new(document::parse(
                configuration.as_bytes(),
                "ServiceConfiguration",
            )?)
            .to_string();

            println!("{}", pretty);
            if let Some(path) = output {
                tokio::fs::write(&path, &pretty)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Configuration written to {}", path.display());
            }
            Ok(Outcome::Done)
        }

        Commands::UpdateConfig {
            service,
            slot,
            settings,
            no_wait,
        } => {
            let service_config = context.config.service(&service)?;
            let subscription_id = context.config.subscription_for(service_config).to_string();
            let settings = if settings.is_empty() {
                service_config.settings.clone()
            } else {
                settings
            };
            if settings.is_empty() {
                return Err(anyhow!(
                    "No settings given; use --set NAME=VALUE or list them under services.{}.settings",
                    service
                ));
            }

            let (name, client) = context.service(&service)?;
            let properties = client.properties(&name).await?;
            let edited = apply_settings(&properties.slot_configuration(&slot)?, &settings)?;
            if !edited.missing.is_empty() {
                warn!("Settings not found: {}", edited.missing.join(", "));
            }

            let request_id = client
                .change_configuration(&name, &slot, &edited.document)
                .await?;
            println!("x-ms-request-id: {}", request_id);

            if no_wait {
                return Ok(Outcome::Accepted);
            }
            context.wait(&subscription_id, &request_id).await
        }

        Commands::Swap { service, no_wait } => {
            let service_config = context.config.service(&service)?;
            let subscription_id = context.config.subscription_for(service_config).to_string();
            let (name, client) = context.service(&service)?;

            match client.swap(&name).await? {
                SwapOutcome::NothingStaged => {
                    println!("There is nothing in the staging slot");
                    Ok(Outcome::Done)
                }
                SwapOutcome::Accepted { request_id, names } => {
                    println!(
                        "Swapping {} into production (was {})",
                        names.staging.as_deref().unwrap_or(""),
                        names.production.as_deref().unwrap_or("empty")
                    );
                    println!("x-ms-request-id: {}", request_id);
                    if no_wait {
                        return Ok(Outcome::Accepted);
                    }
                    context.wait(&subscription_id, &request_id).await
                }
            }
        }

        Commands::Endpoints { service } => {
            let (name, client) = context.service(&service)?;
            for endpoint in client.properties(&name).await?.input_endpoints()? {
                println!("Public Endpoint: {}:{}", endpoint.vip, endpoint.port);
            }
            Ok(Outcome::Done)
        }
    }
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("azmgmt=info,hyper=warn,reqwest=warn"));

    fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    match run(Cli::parse()).await {
        Ok(outcome) => {
            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
