use crate::core::models::OrderStatus;
use anyhow::Result;
use notify_rust::Notification;

pub fn send_state_change_notification(status: &OrderStatus) -> Result<()> {
    let body = match status.label {
        Some(label) => format!("{} (courier: {})", status.state.description(), label),
        None => status.state.description().to_string(),
    };

    Notification::new()
        .summary("Delivery update")
        .body(&body)
        .appname("delivery-bar")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show()?;

    tracing::info!(state = ?status.state, "Sent order state notification");

    Ok(())
}
