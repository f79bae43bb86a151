//! Snapshot-based undo history for the whiteboard.
//!
//! Every committed stroke pushes a full copy of the canvas. The stack is
//! bounded; pushing past the limit evicts the oldest snapshot. Pixel buffers
//! are shared through `Rc`, and the PNG data URL of each snapshot is encoded
//! at most once.

use pb_render::image::{ImageError, from_data_url, to_data_url};
use pb_render::raster::Raster;
use std::cell::OnceCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Snapshot {
    raster: Rc<Raster>,
    encoded: OnceCell<String>,
}

impl Snapshot {
    pub fn capture(raster: &Raster) -> Self {
        Self {
            raster: Rc::new(raster.clone()),
            encoded: OnceCell::new(),
        }
    }

    /// Decode a persisted snapshot. The source string is kept as the cached
    /// encoding.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let raster = from_data_url(url)?;
        Ok(Self {
            raster: Rc::new(raster),
            encoded: OnceCell::from(url.to_string()),
        })
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn data_url(&self) -> Result<&str, ImageError> {
        if let Some(url) = self.encoded.get() {
            return Ok(url.as_str());
        }
        let url = to_data_url(&self.raster)?;
        Ok(self.encoded.get_or_init(|| url).as_str())
    }
}

/// Bounded stack of snapshots, most recent last.
#[derive(Debug, Clone)]
pub struct SnapshotStack {
    entries: VecDeque<Snapshot>,
    limit: usize,
}

impl SnapshotStack {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn top(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    /// Encoded form for persistence, oldest first.
    pub fn to_data_urls(&self) -> Result<Vec<String>, ImageError> {
        self.entries
            .iter()
            .map(|s| s.data_url().map(str::to_string))
            .collect()
    }

    /// Rebuild from persisted data URLs. Only the most recent `limit`
    /// entries are kept.
    pub fn from_data_urls(urls: &[String], limit: usize) -> Result<Self, ImageError> {
        let mut stack = Self::new(limit);
        let skip = urls.len().saturating_sub(stack.limit);
        for url in &urls[skip..] {
            stack.push(Snapshot::from_data_url(url)?);
        }
        Ok(stack)
    }
}
