//! Session fan-out: routes each published record to the subscribers
//! attached to that session.

mod bus;
mod subscriber;

pub use bus::{BusCounts, EegBus};
pub use subscriber::{ChannelSubscriber, DeliveryError, Subscriber};
