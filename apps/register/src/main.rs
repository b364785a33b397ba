use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, FormController, Locale, SubmissionGateway, SubmissionState, SubmitOutcome,
};
use shared::domain::FormField;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Submit a registration request to the waiting list")]
struct Args {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    organization: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    city: String,
    /// Settings file; defaults to ./registration.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Message language: `ar` or `en`.
    #[arg(long)]
    locale: Option<Locale>,
    /// Print the submission result as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(locale) = args.locale {
        settings.locale = locale;
    }

    let gateway =
        SubmissionGateway::from_settings(&settings).context("failed to build registration gateway")?;
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let controller = FormController::new(Arc::new(gateway), settings.locale, move |page| {
        let _ = nav_tx.send(page);
    })
    .with_navigation_delay(settings.navigation_delay());

    for (field, value) in [
        (FormField::Name, args.name),
        (FormField::Email, args.email),
        (FormField::Phone, args.phone),
        (FormField::Organization, args.organization),
        (FormField::Country, args.country),
        (FormField::City, args.city),
    ] {
        controller.update_field(field, value).await;
    }

    match controller.submit().await {
        SubmitOutcome::Completed(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.display_message());
            }
            if !result.success {
                bail!("registration was not saved");
            }
            if let Some(page) = nav_rx.recv().await {
                info!(?page, "registration flow finished");
            }
            Ok(())
        }
        SubmitOutcome::Rejected(missing) => {
            let message = match controller.state().await {
                SubmissionState::Failed(message) => message,
                _ => settings.locale.required_fields_missing().to_string(),
            };
            let missing = missing
                .iter()
                .map(|field| field.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!("{message} ({missing})")
        }
        SubmitOutcome::Ignored => bail!("a registration is already being submitted"),
    }
}
