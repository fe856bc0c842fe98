//! Point-in-time snapshot lifecycle
//!
//! A [`Snapshot`] is opened after the index definition has been written and
//! must be released exactly once before the export returns. Release is
//! best-effort: a failure is logged and never escalated, because the backend
//! expires the snapshot on its own once the keep-alive lapses.

use crate::adapters::search::SearchBackend;
use crate::domain::{ExportError, IndexName, KeepAlive, PitId};

/// An open point-in-time snapshot
///
/// Release consumes the handle, so a snapshot cannot be released twice.
/// Dropping it unreleased (panic, cancelled task) leaks the snapshot until
/// its keep-alive expires; that case is logged.
pub struct Snapshot<'a> {
    backend: &'a dyn SearchBackend,
    pit: PitId,
    released: bool,
}

impl<'a> Snapshot<'a> {
    /// Open a snapshot of `index`
    ///
    /// # Errors
    ///
    /// Propagates the backend error. Nothing needs releasing in that case.
    pub async fn open(
        backend: &'a dyn SearchBackend,
        index: &IndexName,
        keep_alive: &KeepAlive,
    ) -> Result<Snapshot<'a>, ExportError> {
        let pit = backend.open_point_in_time(index, keep_alive).await?;
        tracing::debug!(index = %index, keep_alive = %keep_alive, "Point in time opened");

        Ok(Self {
            backend,
            pit,
            released: false,
        })
    }

    /// The snapshot id
    pub fn pit(&self) -> &PitId {
        &self.pit
    }

    /// Release the snapshot, logging rather than returning any failure
    pub async fn release(mut self) {
        match self.backend.close_point_in_time(&self.pit).await {
            Ok(()) => tracing::debug!("Point in time released"),
            Err(e) => tracing::warn!(
                pit = %self.pit,
                error = %e,
                base_url = self.backend.base_url(),
                "Failed to release point in time; it will expire with its keep-alive"
            ),
        }
        self.released = true;
    }
}

impl Drop for Snapshot<'_> {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                pit = %self.pit,
                base_url = self.backend.base_url(),
                "Point in time dropped without release; it will expire with its keep-alive"
            );
        }
    }
}
