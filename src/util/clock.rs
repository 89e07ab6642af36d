//! Wall-clock helpers.

use chrono::{DateTime, Utc};

/// Current UTC time, used for every lifecycle timestamp.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
