//! Lazily populated chunk storage.
//!
//! Every chunk the viewport has ever touched lives here, keyed by its
//! [`ChunkKey`]. Chunks are created blank on first lookup and replaced
//! wholesale by the compositor or by an explicit load.

use std::collections::HashMap;
use std::fmt;

use crate::coords::ChunkKey;
use crate::surface::ChunkImage;

/// Decides which resident chunks may be dropped after a viewport resolution.
///
/// Keys currently in the viewport are never evicted, whatever the policy
/// returns.
pub trait RetentionPolicy: fmt::Debug {
    /// Called every time a chunk is looked up.
    fn touched(&mut self, _key: ChunkKey) {}

    /// Keys to drop, chosen among `resident`.
    fn select_evictions(
        &mut self,
        resident: &mut dyn Iterator<Item = ChunkKey>,
        visible: &[ChunkKey],
    ) -> Vec<ChunkKey>;
}

/// Keeps every chunk for the lifetime of the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepAll;

impl RetentionPolicy for KeepAll {
    fn select_evictions(
        &mut self,
        _resident: &mut dyn Iterator<Item = ChunkKey>,
        _visible: &[ChunkKey],
    ) -> Vec<ChunkKey> {
        Vec::new()
    }
}

/// Mapping from chunk key to chunk image.
#[derive(Debug)]
pub struct ChunkStore<I> {
    chunks: HashMap<ChunkKey, I>,
    chunk_width: u32,
    chunk_height: u32,
    retention: Box<dyn RetentionPolicy>,
}

impl<I: ChunkImage> ChunkStore<I> {
    /// Create an empty store whose chunks are `chunk_width × chunk_height`.
    pub fn new(chunk_width: u32, chunk_height: u32) -> Self {
        Self {
            chunks: HashMap::new(),
            chunk_width,
            chunk_height,
            retention: Box::new(KeepAll),
        }
    }

    pub fn set_retention(&mut self, policy: Box<dyn RetentionPolicy>) {
        self.retention = policy;
    }

    /// Get the chunk for `key`, creating a blank one if it doesn't exist.
    pub fn get(&mut self, key: ChunkKey) -> &mut I {
        self.retention.touched(key);
        let (width, height) = (self.chunk_width, self.chunk_height);
        self.chunks
            .entry(key)
            .or_insert_with(|| I::blank(width, height))
    }

    /// Look up a chunk without creating it.
    pub fn peek(&self, key: &ChunkKey) -> Option<&I> {
        self.chunks.get(key)
    }

    pub fn all(&self) -> &HashMap<ChunkKey, I> {
        &self.chunks
    }

    /// Insert or replace a chunk wholesale. Returns the previous image.
    pub fn load(&mut self, key: ChunkKey, image: I) -> Option<I> {
        self.retention.touched(key);
        self.chunks.insert(key, image)
    }

    pub fn contains(&self, key: &ChunkKey) -> bool {
        self.chunks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Let the retention policy drop chunks outside `visible`.
    ///
    /// Returns the number of chunks evicted.
    pub fn apply_retention(&mut self, visible: &[ChunkKey]) -> usize {
        let mut resident = self.chunks.keys().copied();
        let evictions = self.retention.select_evictions(&mut resident, visible);

        let mut evicted = 0;
        for key in evictions {
            if visible.contains(&key) {
                continue;
            }
            if self.chunks.remove(&key).is_some() {
                evicted += 1;
            }
        }
        if evicted > 0 {
            tracing::debug!(evicted, resident = self.chunks.len(), "evicted chunks");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterImage;

    #[derive(Debug, Default)]
    struct DropInvisible {
        touched: Vec<ChunkKey>,
    }

    impl RetentionPolicy for DropInvisible {
        fn touched(&mut self, key: ChunkKey) {
            self.touched.push(key);
        }

        fn select_evictions(
            &mut self,
            resident: &mut dyn Iterator<Item = ChunkKey>,
            _visible: &[ChunkKey],
        ) -> Vec<ChunkKey> {
            // offer everything, the store must protect visible keys itself
            resident.collect()
        }
    }

    #[test]
    fn test_get_creates_blank_chunk() {
        let mut store: ChunkStore<RasterImage> = ChunkStore::new(500, 400);
        assert!(store.is_empty());

        let chunk = store.get(ChunkKey::new(0, 0));
        assert!(!chunk.has_content());
        assert_eq!((chunk.width(), chunk.height()), (500, 400));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&ChunkKey::new(0, 0)));
    }

    #[test]
    fn test_get_returns_existing_chunk() {
        let mut store: ChunkStore<RasterImage> = ChunkStore::new(4, 4);
        let image = RasterImage::from_pixels(image::RgbaImage::new(4, 4)).unwrap();
        store.load(ChunkKey::new(1, 1), image.clone());

        assert_eq!(store.get(ChunkKey::new(1, 1)), &image);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_peek_does_not_create() {
        let store: ChunkStore<RasterImage> = ChunkStore::new(4, 4);
        assert!(store.peek(&ChunkKey::new(3, 3)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_replaces() {
        let mut store: ChunkStore<RasterImage> = ChunkStore::new(4, 4);
        store.get(ChunkKey::new(0, 0));
        let previous = store.load(ChunkKey::new(0, 0), RasterImage::blank(8, 8));
        assert!(previous.is_some());
        assert_eq!(store.peek(&ChunkKey::new(0, 0)).unwrap().width(), 8);
    }

    #[test]
    fn test_keep_all_never_evicts() {
        let mut store: ChunkStore<RasterImage> = ChunkStore::new(4, 4);
        for x in 0..10 {
            store.get(ChunkKey::new(x, 0));
        }
        assert_eq!(store.apply_retention(&[ChunkKey::new(0, 0)]), 0);
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_custom_policy_keeps_visible() {
        let mut store: ChunkStore<RasterImage> = ChunkStore::new(4, 4);
        store.set_retention(Box::new(DropInvisible::default()));
        for x in 0..5 {
            store.get(ChunkKey::new(x, 0));
        }
        let visible = [ChunkKey::new(1, 0), ChunkKey::new(2, 0)];
        assert_eq!(store.apply_retention(&visible), 3);
        assert_eq!(store.len(), 2);
        assert!(visible.iter().all(|key| store.contains(key)));
    }
}
