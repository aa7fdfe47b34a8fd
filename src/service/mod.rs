//! # Service layer
//!
//! One submodule per entity family. Every operation follows the same order:
//!
//! 1. reject non-positive path ids before touching storage,
//! 2. run the request through [`validate`](crate::validate),
//! 3. probe the store for every entity the request references,
//! 4. for updates, fetch the stored entity, merge the patch and re-validate the result,
//! 5. persist, translating constraint violations into [`ServiceError`].
//!
//! Steps are not wrapped in a transaction. A racing writer can slip between a probe and
//! the write; the store's unique and foreign-key constraints still reject the write and
//! the caller sees the same `Conflict` or `NotFound` it would have seen from the probe.

use crate::ServiceError;

/// Team operations.
pub mod team;

/// Player operations.
pub mod player;

/// Game operations.
pub mod game;

/// Player statistics operations.
pub mod player_stats;

fn require_positive(entity: &'static str, id: i64) -> Result<(), ServiceError> {
    if id <= 0 {
        tracing::debug!(entity, id, "rejected non-positive id");
        return Err(ServiceError::InvalidArgument(format!(
            "{} ID must be positive, got {}",
            entity, id
        )));
    }
    Ok(())
}
