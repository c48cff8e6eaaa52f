use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The single in-progress order of the logged-in user, fetched fresh on
/// every poll.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOrder {
    pub id: i64,
    pub tracking_id: String,
    pub raw_status: i64,
    pub total_price: Option<f64>,
    pub restaurant: Coordinate,
    pub destination: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    NoOrder,
    Created,
    Cooking,
    WaitingForDelivery,
    InDelivery,
}

impl OrderState {
    pub fn description(&self) -> &'static str {
        match self {
            OrderState::NoOrder => "no active order",
            OrderState::Created => "order created",
            OrderState::Cooking => "cooking",
            OrderState::WaitingForDelivery => "waiting for delivery",
            OrderState::InDelivery => "in delivery",
        }
    }
}

/// Coarse courier proximity bucket. Not a distance estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityLabel {
    NoCourier,
    FiveMinutes,
    TwentyMinutes,
    OverThirtyMinutes,
}

impl ProximityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProximityLabel::NoCourier => "no courier",
            ProximityLabel::FiveMinutes => "5m",
            ProximityLabel::TwentyMinutes => "20m",
            ProximityLabel::OverThirtyMinutes => ">30m",
        }
    }
}

impl std::fmt::Display for ProximityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatus {
    pub state: OrderState,
    pub label: Option<ProximityLabel>,
}

impl OrderStatus {
    pub fn no_order() -> Self {
        Self {
            state: OrderState::NoOrder,
            label: None,
        }
    }

    /// Short text for the tray title; empty when there is no order.
    pub fn title(&self) -> &'static str {
        self.label.as_ref().map_or("", ProximityLabel::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_descriptions() {
        assert_eq!(OrderState::NoOrder.description(), "no active order");
        assert_eq!(OrderState::Cooking.description(), "cooking");
        assert_eq!(
            OrderState::WaitingForDelivery.description(),
            "waiting for delivery"
        );
        assert_eq!(OrderState::InDelivery.description(), "in delivery");
    }

    #[test]
    fn test_label_display_matches_as_str() {
        assert_eq!(ProximityLabel::NoCourier.to_string(), "no courier");
        assert_eq!(ProximityLabel::FiveMinutes.to_string(), "5m");
        assert_eq!(ProximityLabel::TwentyMinutes.to_string(), "20m");
        assert_eq!(ProximityLabel::OverThirtyMinutes.to_string(), ">30m");
    }

    #[test]
    fn test_no_order_has_empty_title() {
        let status = OrderStatus::no_order();
        assert_eq!(status.state, OrderState::NoOrder);
        assert_eq!(status.title(), "");
    }

    #[test]
    fn test_order_state_serializes_snake_case() {
        let json = serde_json::to_string(&OrderState::WaitingForDelivery).unwrap();
        assert_eq!(json, "\"waiting_for_delivery\"");
    }
}
