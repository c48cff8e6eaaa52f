use crate::core::store::StatusStore;
use crate::daemon::polling::PollHandle;
use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};
use zbus::interface;

pub struct DeliveryBarService {
    polling: PollHandle,
    store: StatusStore,
}

impl DeliveryBarService {
    pub fn new(polling: PollHandle, store: StatusStore) -> Self {
        Self { polling, store }
    }
}

#[interface(name = "io.github.deliverybar.DeliveryBar")]
impl DeliveryBarService {
    async fn refresh(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus Refresh called");
        if !self.polling.refresh() {
            return Err(zbus::fdo::Error::Failed(
                "Polling loop is not running".to_string(),
            ));
        }
        Ok(())
    }

    async fn quit(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus Quit called");
        self.polling.quit();
        Ok(())
    }

    /// Current tray title and tooltip.
    async fn status(&self) -> (String, String) {
        (self.store.title().await, self.store.tooltip().await)
    }

    /// Last poll result as JSON.
    async fn snapshot(&self) -> zbus::fdo::Result<String> {
        let snapshot = self.store.snapshot().await;
        serde_json::to_string(&snapshot).map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
    }
}

pub async fn start_dbus_server(polling: PollHandle, store: StatusStore) -> Result<zbus::Connection> {
    let connection = zbus::connection::Builder::session()
        .context("Failed to connect to session D-Bus")?
        .name(DBUS_NAME)
        .context("Failed to request D-Bus name")?
        .serve_at(DBUS_PATH, DeliveryBarService::new(polling, store))
        .context("Failed to register D-Bus interface")?
        .build()
        .await
        .context("Failed to start D-Bus server")?;

    tracing::info!(name = DBUS_NAME, path = DBUS_PATH, "D-Bus service started");
    Ok(connection)
}
