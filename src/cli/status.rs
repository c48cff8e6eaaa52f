use crate::core::credentials::Credentials;
use crate::core::error::DeliveryError;
use crate::core::models::{OrderState, OrderStatus};
use crate::core::settings::Settings;
use crate::providers::{DelivioGateway, OrderTracker, SessionClient};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct StatusOutput {
    state: OrderState,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let credentials = Credentials::from_env()?;

    let session = SessionClient::new(&settings.api)?;
    let mut gateway = DelivioGateway::new(session, &settings.api);

    let result = match gateway.login(&credentials).await {
        Ok(()) => gateway.refresh_order_status().await,
        Err(e) => Err(e),
    };
    let output = to_output(result);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn to_output(result: Result<OrderStatus, DeliveryError>) -> StatusOutput {
    let (status, error) = match result {
        Ok(status) => (status, None),
        Err(e) => (OrderStatus::no_order(), Some(e.to_string())),
    };

    StatusOutput {
        state: status.state,
        label: status.title().to_string(),
        error,
        fetched_at: Utc::now(),
    }
}

fn print_text_output(output: &StatusOutput) {
    if let Some(error) = &output.error {
        println!("Error: {}", error);
        return;
    }

    if output.label.is_empty() {
        println!("{}", output.state.description());
    } else {
        println!(
            "{:<22} courier: {}",
            output.state.description(),
            output.label
        );
    }
}
