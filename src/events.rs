//! Events

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{ids::TypedId, products::ProductId};

/// Event document id.
pub type EventId = TypedId<Event>;

/// Color used when a product has no status.
pub const NO_STATUS_COLOR: &str = "#000000";

/// A sale event grouping products with a shared close date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Document id.
    pub id: EventId,

    /// Display name.
    pub name: String,

    /// When ordering closes.
    pub end_date: Timestamp,

    /// Products sold during the event.
    pub product_ids: Vec<ProductId>,

    /// Fulfilment status per product.
    pub product_statuses: Vec<ProductStatus>,

    /// Number of sizing charts attached to the event.
    pub sizing_chart_count: u32,
}

impl Event {
    /// Whether the event is still open at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.end_date > now
    }

    /// Fulfilment status of a product, if one has been recorded.
    #[must_use]
    pub fn status_of(&self, product: &ProductId) -> Option<EventProductStatus> {
        self.product_statuses
            .iter()
            .find(|entry| &entry.product_id == product)
            .map(|entry| entry.status)
    }
}

/// Fulfilment status recorded for one product of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStatus {
    /// Product the status applies to.
    pub product_id: ProductId,

    /// Current status.
    pub status: EventProductStatus,
}

/// Fulfilment states of an event product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventProductStatus {
    /// Waiting at the pickup location.
    ReadyForPickup,

    /// Collected by the buyer.
    PickedUp,

    /// Handed to the carrier.
    Shipped,

    /// Received by the buyer.
    Delivered,
}

impl EventProductStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReadyForPickup => "Ready for Pickup",
            Self::PickedUp => "Picked Up",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }

    /// Display color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::ReadyForPickup | Self::PickedUp | Self::Shipped | Self::Delivered => "green",
        }
    }
}

/// Display color for an optional status.
#[must_use]
pub fn status_color(status: Option<EventProductStatus>) -> &'static str {
    status.map_or(NO_STATUS_COLOR, EventProductStatus::color)
}

impl fmt::Display for EventProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown status label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event product status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for EventProductStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Ready for Pickup" => Ok(Self::ReadyForPickup),
            "Picked Up" => Ok(Self::PickedUp),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Events still open at `now`.
pub fn active_events(events: &[Event], now: Timestamp) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |event| event.is_active(now))
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    fn event(id: &str, end_date: Timestamp) -> Event {
        Event {
            id: EventId::new(id),
            name: id.to_string(),
            end_date,
            product_ids: vec![ProductId::new("p1")],
            product_statuses: vec![ProductStatus {
                product_id: ProductId::new("p1"),
                status: EventProductStatus::Shipped,
            }],
            sizing_chart_count: 0,
        }
    }

    #[test]
    fn active_events_end_strictly_after_now() -> TestResult {
        let now = Timestamp::from_second(1_000_000)?;

        let events = [
            event("past", now.checked_sub(1.hour())?),
            event("now", now),
            event("future", now.checked_add(1.hour())?),
        ];

        let active: Vec<&str> = active_events(&events, now)
            .map(|event| event.id.as_str())
            .collect();

        assert_eq!(active, vec!["future"]);

        Ok(())
    }

    #[test]
    fn status_lookup_and_color() {
        let event = event("e1", Timestamp::UNIX_EPOCH);

        assert_eq!(
            event.status_of(&ProductId::new("p1")),
            Some(EventProductStatus::Shipped)
        );
        assert_eq!(event.status_of(&ProductId::new("p2")), None);
        assert_eq!(status_color(event.status_of(&ProductId::new("p1"))), "green");
        assert_eq!(status_color(None), NO_STATUS_COLOR);
    }

    #[test]
    fn status_labels_parse_back() -> TestResult {
        for status in [
            EventProductStatus::ReadyForPickup,
            EventProductStatus::PickedUp,
            EventProductStatus::Shipped,
            EventProductStatus::Delivered,
        ] {
            assert_eq!(status.label().parse::<EventProductStatus>()?, status);
        }

        assert!("Lost".parse::<EventProductStatus>().is_err());

        Ok(())
    }
}
