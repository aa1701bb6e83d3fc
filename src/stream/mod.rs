//! Stream utilities for snapshot subscriptions

mod coalesce;

pub use coalesce::{Coalesce, CoalesceExt};
