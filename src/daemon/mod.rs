mod dbus;
pub mod polling;
pub mod presenter;

use crate::core::credentials::Credentials;
use crate::core::settings::Settings;
use crate::core::store::StatusStore;
use crate::providers::{DelivioGateway, SessionClient};
use anyhow::{Context, Result};
use std::time::Duration;

pub use polling::PollingLoop;
pub use presenter::StatusLinePresenter;

pub const DBUS_NAME: &str = "io.github.deliverybar.DeliveryBar";
pub const DBUS_PATH: &str = "/io/github/deliverybar";

/// Time left for an in-flight D-Bus reply (e.g. to `Quit`) to reach the caller.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

pub async fn run() -> Result<()> {
    tracing::info!("Starting delivery-bar daemon");

    let settings = Settings::load()?;
    let credentials = Credentials::from_env()?;

    let session = SessionClient::new(&settings.api)?;
    let mut gateway = DelivioGateway::new(session, &settings.api);
    gateway
        .login(&credentials)
        .await
        .context("Initial login failed")?;

    let store = StatusStore::new(settings.display.max_error_len);
    let (polling, handle) = PollingLoop::new(gateway, settings.polling.interval());

    let dbus_connection = match dbus::start_dbus_server(handle.clone(), store.clone()).await {
        Ok(connection) => Some(connection),
        Err(e) => {
            tracing::warn!(error = %e, "D-Bus unavailable, manual refresh disabled");
            None
        }
    };

    let ctrl_c_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            ctrl_c_handle.quit();
        }
    });
    drop(handle);

    let mut presenter = StatusLinePresenter::new(store, &settings);
    polling.run(&mut presenter).await;
    close_dbus(dbus_connection).await;

    tracing::info!("delivery-bar daemon stopped");
    Ok(())
}

async fn close_dbus(connection: Option<zbus::Connection>) {
    let Some(connection) = connection else {
        return;
    };
    tokio::time::sleep(SHUTDOWN_GRACE).await;
    if let Err(e) = connection.close().await {
        tracing::debug!(error = %e, "D-Bus connection did not close cleanly");
    }
}
