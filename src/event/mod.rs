mod bus;

pub use bus::{Subject, SubscriptionId};
