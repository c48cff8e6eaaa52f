use crate::core::error::DeliveryError;
use crate::core::models::{OrderState, OrderStatus};
use crate::core::notifications::send_state_change_notification;
use crate::core::settings::Settings;
use crate::core::store::StatusStore;
use crate::daemon::polling::StatusPresenter;
use async_trait::async_trait;

pub struct StatusLinePresenter {
    store: StatusStore,
    notifications: bool,
}

impl StatusLinePresenter {
    pub fn new(store: StatusStore, settings: &Settings) -> Self {
        Self {
            store,
            notifications: settings.notifications.enabled,
        }
    }

    async fn apply_success(&self, status: &OrderStatus) {
        let previous = self.store.update_status(status.clone()).await;

        tracing::info!(
            state = ?status.state,
            label = status.title(),
            "Order status refreshed"
        );

        let changed = previous != Some(status.state);
        if changed && status.state != OrderState::NoOrder && self.notifications {
            if let Err(e) = send_state_change_notification(status) {
                tracing::warn!(error = %e, "Failed to send notification");
            }
        }
    }

    async fn apply_failure(&self, error: &DeliveryError) {
        if error.is_unauthorized() {
            tracing::error!(
                error = %error,
                "Session rejected; restart with valid credentials to resume tracking"
            );
        } else {
            tracing::warn!(error = %error, "Failed to refresh order status");
        }

        self.store.set_error(error.to_string()).await;
    }
}

#[async_trait]
impl StatusPresenter for StatusLinePresenter {
    async fn present(&mut self, result: &Result<OrderStatus, DeliveryError>) {
        match result {
            Ok(status) => self.apply_success(status).await,
            Err(e) => self.apply_failure(e).await,
        }
    }
}
