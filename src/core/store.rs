use crate::core::models::{OrderState, OrderStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreInner {
    status: Option<OrderStatus>,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub state: OrderState,
    pub label: String,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Errors longer than the title budget are cut one character short of it.
fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars.saturating_sub(1)).collect()
    } else {
        text.to_string()
    }
}

/// Last known order status, shared between the poll loop and the D-Bus
/// service. Errors are kept in full; only the title is truncated.
#[derive(Clone)]
pub struct StatusStore {
    inner: Arc<RwLock<StoreInner>>,
    max_error_len: usize,
}

impl StatusStore {
    pub fn new(max_error_len: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            max_error_len,
        }
    }

    /// Records a successful poll and returns the previously known state.
    pub async fn update_status(&self, status: OrderStatus) -> Option<OrderState> {
        let mut inner = self.inner.write().await;
        let previous = inner.status.as_ref().map(|s| s.state);
        inner.status = Some(status);
        inner.error = None;
        inner.updated_at = Some(Utc::now());
        previous
    }

    /// Records a failed poll. The last good status is kept.
    pub async fn set_error(&self, error: String) {
        let mut inner = self.inner.write().await;
        inner.error = Some(error);
        inner.updated_at = Some(Utc::now());
    }

    pub async fn title(&self) -> String {
        let inner = self.inner.read().await;
        match (&inner.error, &inner.status) {
            (Some(error), _) => truncate_for_display(error, self.max_error_len),
            (None, Some(status)) => status.title().to_string(),
            (None, None) => String::new(),
        }
    }

    pub async fn tooltip(&self) -> String {
        let inner = self.inner.read().await;
        match (&inner.error, &inner.status) {
            (Some(error), _) => error.clone(),
            (None, Some(status)) => status.state.description().to_string(),
            (None, None) => OrderState::NoOrder.description().to_string(),
        }
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read().await;
        let status = inner.status.clone().unwrap_or_else(OrderStatus::no_order);
        StatusSnapshot {
            state: status.state,
            label: status.title().to_string(),
            error: inner.error.clone(),
            updated_at: inner.updated_at,
        }
    }
}
