use std::sync::Arc;

use anyhow::Context;

use wavelift::application::services::TransferPipeline;
use wavelift::infrastructure::credentials::HttpCredentialBroker;
use wavelift::infrastructure::observability::{IndicatifProgress, TracingConfig, init_tracing};
use wavelift::infrastructure::storage::StoreConnectorFactory;
use wavelift::presentation::{Environment, Invocation, Settings, build_cli, parse_invocation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let matches = build_cli().get_matches();
    let invocation = parse_invocation(&matches).context("Unrecognized command")?;

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ));

    let broker = Arc::new(HttpCredentialBroker::new(
        settings.broker.base_url.clone(),
        settings.broker.app_key.clone(),
        settings.broker.app_secret.clone(),
    ));
    let connector = StoreConnectorFactory::create(&settings.storage)
        .context("Failed to configure object storage")?;
    let pipeline = TransferPipeline::new(broker, connector)
        .with_progress(Arc::new(IndicatifProgress::stderr()));
    let transfer = &settings.transfer;

    let output = match invocation {
        Invocation::Split { file, request_id } => {
            let outcome = pipeline
                .split_and_upload(&file, &request_id, transfer)
                .await
                .with_context(|| format!("Failed to split {}", file.display()))?;
            serde_json::to_string_pretty(&outcome)?
        }
        Invocation::Resample { file, key, target } => {
            let outcome = pipeline
                .resample_and_upload(&file, key, target, transfer)
                .await
                .with_context(|| format!("Failed to resample {}", file.display()))?;
            serde_json::to_string_pretty(&outcome)?
        }
        Invocation::Upload { file, key } => {
            let outcome = pipeline
                .upload_file(&file, key, transfer)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            serde_json::to_string_pretty(&outcome)?
        }
        Invocation::Put { file, key } => {
            let outcome = pipeline
                .upload_preprocessed(&file, key, transfer)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            serde_json::to_string_pretty(&outcome)?
        }
    };

    println!("{}", output);

    Ok(())
}
