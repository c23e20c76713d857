// File: services/audiencelab_agent/src/main.rs
use audiencelab_common::{config_error, init_from_config, SdkError};
use audiencelab_config::load_config;
use audiencelab_sdk::{AudienceLab, CustomEventParams};
use serde_json::Value;
use std::process::ExitCode;
use tracing::{error, info};

const USAGE: &str = "usage: audiencelab-agent [COMMAND]

With no command the SDK is initialized and today's retention event is sent.

commands:
  purchase <id> <name> <value> <currency> <status> [tr_id]
  ad <ad_id> <name> <source> <watch_time> <reward> <media_source> <channel> <value> <currency>
  event <name> <value> [id]
  verify <token>
  status
  totals
  reset";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_from_config(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("-h" | "--help")) {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let Some(api_key) = config.api_key.clone().filter(|key| !key.is_empty()) else {
        error!("No API key configured, set AUDIENCELAB__API_KEY");
        return ExitCode::FAILURE;
    };

    let sdk = AudienceLab::builder(config).build();
    match run(&sdk, &api_key, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(sdk: &AudienceLab, api_key: &str, args: &[String]) -> Result<(), SdkError> {
    let outcome = sdk.initialize(api_key).await?;
    info!("Creative token: {}", outcome.token);
    info!("Retention: {:?}", outcome.metrics);

    let Some((command, rest)) = args.split_first() else {
        return Ok(());
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let body = match (command.as_str(), rest.as_slice()) {
        ("purchase", [id, name, value, currency, status]) => {
            sdk.send_custom_purchase_event(id, name, number(value)?, currency, status)
                .await?
        }
        ("purchase", [id, name, value, currency, status, tr_id]) => {
            sdk.send_custom_purchase_event_with_transaction(
                id,
                name,
                number(value)?,
                currency,
                status,
                tr_id,
            )
            .await?
        }
        (
            "ad",
            [ad_id, name, source, watch_time, reward, media_source, channel, value, currency],
        ) => {
            sdk.send_custom_ad_event(
                ad_id,
                name,
                source,
                number(watch_time)?,
                flag(reward)?,
                media_source,
                channel,
                number(value)?,
                currency,
            )
            .await?
        }
        ("event", [name, value, id @ ..]) if id.len() <= 1 => {
            let params = CustomEventParams {
                value: value.to_string(),
                id: id.first().map(|id| id.to_string()),
                key: None,
            };
            sdk.send_custom_event(name, params).await?
        }
        ("verify", [token]) => sdk.verify_token(token).await?,
        ("status", []) => sdk.check_data_collection_status().await?,
        ("totals", []) => serde_json::json!({
            "totalAdValue": sdk.total_ad_value().await,
            "totalPurchaseValue": sdk.total_purchase_value().await,
        }),
        ("reset", []) => {
            sdk.reset().await;
            Value::Null
        }
        _ => {
            return Err(config_error(format!(
                "Unrecognized command {:?}\n{}",
                command, USAGE
            )))
        }
    };
    println!("{}", body);
    Ok(())
}

fn number(raw: &str) -> Result<f64, SdkError> {
    raw.parse()
        .map_err(|_| config_error(format!("Expected a number, got {:?}", raw)))
}

fn flag(raw: &str) -> Result<bool, SdkError> {
    raw.parse()
        .map_err(|_| config_error(format!("Expected true or false, got {:?}", raw)))
}
