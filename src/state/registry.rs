use iced::widget::image::Handle;
use std::fmt;
use std::mem;
use tracing::debug;

use super::entry::{CompressedImage, ImageEntry};
use crate::codec::DataUrl;

/// Stable handle to a registry slot
///
/// Assigned in insertion order and never reused, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registry slot: either a live entry or a tombstone
#[derive(Debug)]
enum Slot {
    Present(ImageEntry),
    Removed,
}

/// The Registry tracks every image the user has added.
///
/// Slots are only ever appended. Removing an image writes a `Removed`
/// tombstone in its place so every other `EntryId` stays valid.
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its handle
    pub fn insert(&mut self, entry: ImageEntry) -> EntryId {
        let id = EntryId(self.slots.len());
        self.slots.push(Slot::Present(entry));
        id
    }

    /// The live entry for `id`, or None if removed or unknown
    pub fn get(&self, id: EntryId) -> Option<&ImageEntry> {
        match self.slots.get(id.0) {
            Some(Slot::Present(entry)) => Some(entry),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut ImageEntry> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Present(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Tombstone a slot, returning the entry that was there
    pub fn remove(&mut self, id: EntryId) -> Option<ImageEntry> {
        let slot = self.slots.get_mut(id.0)?;
        match mem::replace(slot, Slot::Removed) {
            Slot::Present(entry) => Some(entry),
            Slot::Removed => None,
        }
    }

    /// Every handle ever assigned, tombstones included
    pub fn ids(&self) -> impl Iterator<Item = EntryId> {
        (0..self.slots.len()).map(EntryId)
    }

    /// Live entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &ImageEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Present(entry) => Some((EntryId(index), entry)),
                Slot::Removed => None,
            })
    }

    /// Number of live entries
    pub fn present_count(&self) -> usize {
        self.iter().count()
    }

    /// True when no live entries remain
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Compress All is available while any image is present
    pub fn can_compress_all(&self) -> bool {
        !self.is_empty()
    }

    /// Download All is available once every present image is compressed
    pub fn can_download_all(&self) -> bool {
        !self.is_empty() && self.iter().all(|(_, entry)| entry.is_compressed())
    }

    /// Mark a compression as dispatched and hand back the original to encode
    pub fn begin_compression(&mut self, id: EntryId) -> Option<DataUrl> {
        let entry = self.get_mut(id)?;
        entry.start_compression();
        Some(entry.original.clone())
    }

    /// Store a finished compression if the entry is still present
    ///
    /// Returns false (and drops the result) when the entry was removed
    /// while the compression was in flight.
    pub fn apply_compression(&mut self, id: EntryId, image: CompressedImage, preview: Handle) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.finish_compression(image, preview);
                true
            }
            None => {
                debug!("Discarding compression result for removed entry {}", id);
                false
            }
        }
    }

    /// Record a failed compression if the entry is still present
    pub fn fail_compression(&mut self, id: EntryId, message: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.fail_compression(message.into());
                true
            }
            None => false,
        }
    }
}
