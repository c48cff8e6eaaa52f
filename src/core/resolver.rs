use crate::core::error::DeliveryError;
use crate::core::models::{Coordinate, OrderState, ProximityLabel};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

const FAR_THRESHOLD_M: f64 = 1500.0;
const NEAR_THRESHOLD_M: f64 = 500.0;

/// Raw order status codes the orders endpoint is filtered on. 14 is polled
/// for but has no known meaning, so it resolves to an error.
pub const IN_PROGRESS_STATUSES: [i64; 5] = [2, 4, 12, 14, 16];

pub fn state_from_raw_status(code: i64) -> Result<OrderState, DeliveryError> {
    match code {
        2 => Ok(OrderState::Created),
        4 => Ok(OrderState::Cooking),
        16 => Ok(OrderState::WaitingForDelivery),
        12 => Ok(OrderState::InDelivery),
        other => Err(DeliveryError::UnknownOrderStatus(other)),
    }
}

/// Until pickup the courier is measured against the restaurant, afterwards
/// against the delivery address.
pub fn reference_point_for(
    state: OrderState,
    restaurant: Coordinate,
    destination: Coordinate,
) -> Coordinate {
    match state {
        OrderState::InDelivery => destination,
        OrderState::NoOrder
        | OrderState::Created
        | OrderState::Cooking
        | OrderState::WaitingForDelivery => restaurant,
    }
}

pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_M * central_angle
}

pub fn label_for_distance(meters: f64) -> ProximityLabel {
    if meters > FAR_THRESHOLD_M {
        ProximityLabel::OverThirtyMinutes
    } else if meters > NEAR_THRESHOLD_M {
        ProximityLabel::TwentyMinutes
    } else {
        ProximityLabel::FiveMinutes
    }
}

pub fn proximity_label(courier: Option<Coordinate>, reference: Coordinate) -> ProximityLabel {
    match courier {
        Some(courier) => label_for_distance(haversine_meters(courier, reference)),
        None => ProximityLabel::NoCourier,
    }
}
