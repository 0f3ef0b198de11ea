//! Collision-resistant string identifiers.
//!
//! Entity ids combine a short type prefix, a random component, and a time
//! component: `p_1f2e3d4c5b6a_18b9c0d1e2f`. Uniqueness is probabilistic;
//! there is no global counter and no collision check.

use chrono::Utc;
use uuid::Uuid;

/// Generate an identifier with the given prefix. Never fails.
pub fn uid(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    let millis = Utc::now().timestamp_millis().max(0);
    format!("{}_{}_{:x}", prefix, &random[..12], millis)
}
