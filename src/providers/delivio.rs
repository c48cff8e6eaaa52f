use crate::core::credentials::Credentials;
use crate::core::error::DeliveryError;
use crate::core::models::{ActiveOrder, Coordinate, OrderStatus};
use crate::core::resolver::{
    proximity_label, reference_point_for, state_from_raw_status, IN_PROGRESS_STATUSES,
};
use crate::core::settings::ApiSettings;
use crate::providers::session::SessionClient;
use crate::providers::OrderTracker;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OrderListing {
    #[serde(rename = "hydra:member", default)]
    members: Vec<OrderResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResource {
    id: i64,
    uuid: String,
    status: i64,
    #[serde(default)]
    total_price: Option<f64>,
    restaurant: RestaurantResource,
    latitude: f64,
    longitude: f64,
}

/// Restaurant coordinates are read from the nested `info` object only.
#[derive(Debug, Deserialize)]
struct RestaurantResource {
    info: PositionResource,
}

#[derive(Debug, Deserialize)]
struct PositionResource {
    latitude: f64,
    longitude: f64,
}

impl From<PositionResource> for Coordinate {
    fn from(position: PositionResource) -> Self {
        Coordinate::new(position.latitude, position.longitude)
    }
}

impl From<OrderResource> for ActiveOrder {
    fn from(order: OrderResource) -> Self {
        Self {
            id: order.id,
            tracking_id: order.uuid,
            raw_status: order.status,
            total_price: order.total_price,
            restaurant: order.restaurant.info.into(),
            destination: Coordinate::new(order.latitude, order.longitude),
        }
    }
}

pub struct DelivioGateway {
    session: SessionClient,
    orders_path: String,
    track_path: String,
    page_size: u32,
}

impl DelivioGateway {
    pub fn new(session: SessionClient, settings: &ApiSettings) -> Self {
        Self {
            session,
            orders_path: settings.orders_path.clone(),
            track_path: settings.track_path.clone(),
            page_size: settings.page_size,
        }
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), DeliveryError> {
        self.session.login(credentials).await
    }

    fn active_orders_path(&self) -> String {
        let mut path = format!(
            "{}?orderby[created]=DESC&is_history_viewable=true&itemsPerPage={}",
            self.orders_path, self.page_size
        );
        for status in IN_PROGRESS_STATUSES {
            path.push_str(&format!("&status[]={status}"));
        }
        path
    }

    pub async fn fetch_active_order(&mut self) -> Result<Option<ActiveOrder>, DeliveryError> {
        let path = self.active_orders_path();
        let listing: OrderListing = self
            .session
            .send(|http, base| http.get(format!("{base}{path}")))
            .await?;

        let mut members = listing.members;
        match members.len() {
            0 => Ok(None),
            1 => Ok(members.pop().map(ActiveOrder::from)),
            count => {
                tracing::warn!(count, "Multiple active orders found");
                Err(DeliveryError::MultipleActiveOrders(count))
            }
        }
    }

    /// First reported courier position, or `None` while no courier is
    /// visible. Further samples are ignored rather than averaged.
    pub async fn fetch_courier_coordinate(
        &mut self,
        tracking_id: &str,
    ) -> Result<Option<Coordinate>, DeliveryError> {
        let path = self.track_path.replace("{uuid}", tracking_id);
        let positions: Vec<PositionResource> = self
            .session
            .send(|http, base| http.get(format!("{base}{path}")))
            .await?;

        if positions.len() > 1 {
            tracing::debug!(
                samples = positions.len(),
                "Using first of several courier positions"
            );
        }

        Ok(positions.into_iter().next().map(Coordinate::from))
    }
}

#[async_trait]
impl OrderTracker for DelivioGateway {
    async fn refresh_order_status(&mut self) -> Result<OrderStatus, DeliveryError> {
        if !self.session.is_logged_in() {
            return Err(DeliveryError::Auth("not logged in".to_string()));
        }

        let Some(order) = self.fetch_active_order().await? else {
            return Ok(OrderStatus::no_order());
        };

        let state = state_from_raw_status(order.raw_status)?;
        let courier = self.fetch_courier_coordinate(&order.tracking_id).await?;
        let reference = reference_point_for(state, order.restaurant, order.destination);
        let label = proximity_label(courier, reference);

        tracing::debug!(
            order_id = order.id,
            raw_status = order.raw_status,
            ?state,
            courier_visible = courier.is_some(),
            %label,
            "Resolved order status"
        );

        Ok(OrderStatus {
            state,
            label: Some(label),
        })
    }
}
