//! Auth-code entity, its closed target enum, the redacted secret, and the flat persisted row.

pub mod record;
pub mod row;
pub mod secret;
pub mod target;
