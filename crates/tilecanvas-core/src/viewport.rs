use crate::coords::{ChunkCoord, ChunkGrid, ChunkKey, Point};

/// Inclusive rectangle of chunk coordinates covered by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub first_x: i64,
    pub last_x: i64,
    pub first_y: i64,
    pub last_y: i64,
}

impl ChunkRange {
    pub fn new(first: ChunkCoord, last: ChunkCoord) -> Self {
        Self {
            first_x: first.x,
            last_x: last.x,
            first_y: first.y,
            last_y: last.y,
        }
    }

    /// A range containing no chunks.
    pub fn empty() -> Self {
        Self {
            first_x: 0,
            last_x: -1,
            first_y: 0,
            last_y: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_x < self.first_x || self.last_y < self.first_y
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.first_x
            && coord.x <= self.last_x
            && coord.y >= self.first_y
            && coord.y <= self.last_y
    }

    pub fn col_count(&self) -> usize {
        span(self.first_x, self.last_x)
    }

    pub fn row_count(&self) -> usize {
        span(self.first_y, self.last_y)
    }

    pub fn len(&self) -> usize {
        self.col_count().saturating_mul(self.row_count())
    }

    /// Keys in the range, column by column.
    pub fn keys(&self) -> impl Iterator<Item = ChunkKey> {
        let Self {
            first_x,
            last_x,
            first_y,
            last_y,
        } = *self;
        (first_x..=last_x).flat_map(move |x| (first_y..=last_y).map(move |y| ChunkKey::new(x, y)))
    }
}

fn span(first: i64, last: i64) -> usize {
    if last < first {
        return 0;
    }
    (last.abs_diff(first) as usize).saturating_add(1)
}

/// Chunks intersecting a `viewport_width × viewport_height` viewport whose
/// top-left corner sits at `camera` in world space.
///
/// Partially covered chunks on every edge are included. The far edge is
/// exclusive: a 1000 px viewport over 500 px chunks covers exactly two
/// columns, a 1001 px one spills into a third.
///
/// Near the edges of the `i64` range the far edge is clamped, so the range
/// never wraps around.
pub fn resolve(
    grid: &ChunkGrid,
    camera: Point,
    viewport_width: u32,
    viewport_height: u32,
) -> ChunkRange {
    if viewport_width == 0 || viewport_height == 0 {
        return ChunkRange::empty();
    }
    let top_left = grid.world_to_chunk(camera.x, camera.y);
    let bottom_right = grid.world_to_chunk(
        camera.x.saturating_add(viewport_width as i64 - 1),
        camera.y.saturating_add(viewport_height as i64 - 1),
    );
    ChunkRange::new(top_left, bottom_right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_keys(range: ChunkRange) -> Vec<ChunkKey> {
        let mut keys: Vec<_> = range.keys().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_exact_fit_has_four_chunks() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::ORIGIN, 1000, 1000);
        assert_eq!(range.len(), 4);
        assert_eq!(
            sorted_keys(range),
            vec![
                ChunkKey::new(0, 0),
                ChunkKey::new(0, 1),
                ChunkKey::new(1, 0),
                ChunkKey::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_one_pixel_spill_adds_column() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::ORIGIN, 1001, 1000);
        assert_eq!(range.len(), 6);
        assert_eq!(range.col_count(), 3);
        assert!(range.contains(ChunkCoord::new(2, 0)));
        assert!(range.contains(ChunkCoord::new(2, 1)));
        assert!(!range.contains(ChunkCoord::new(0, 2)));
    }

    #[test]
    fn test_offset_camera_covers_partial_edges() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::new(250, 250), 1000, 1000);
        assert_eq!(range, ChunkRange::new(ChunkCoord::new(0, 0), ChunkCoord::new(2, 2)));
        assert_eq!(range.len(), 9);
    }

    #[test]
    fn test_negative_camera() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::new(-1, -1), 2, 2);
        assert_eq!(range, ChunkRange::new(ChunkCoord::new(-1, -1), ChunkCoord::new(0, 0)));
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_small_viewport_inside_one_chunk() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::new(10, 10), 100, 100);
        assert_eq!(sorted_keys(range), vec![ChunkKey::new(0, 0)]);
    }

    #[test]
    fn test_empty_viewport() {
        let grid = ChunkGrid::new(500, 500);
        let range = resolve(&grid, Point::ORIGIN, 0, 600);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.keys().count(), 0);
    }

    #[test]
    fn test_camera_near_max_clamps_far_edge() {
        let grid = ChunkGrid::new(50, 50);
        let camera = Point::new(i64::MAX - 10, i64::MIN);
        let range = resolve(&grid, camera, 100, 100);
        let last = grid.world_to_chunk(i64::MAX, i64::MIN + 99);
        assert_eq!(range.last_x, last.x);
        assert_eq!(range.first_x, grid.world_to_chunk(camera.x, 0).x);
        assert!(!range.is_empty());
        assert_eq!(range.col_count(), 2);
        assert_eq!(range.row_count(), 3);
    }

    #[test]
    fn test_keys_visit_columns_first() {
        let range = ChunkRange::new(ChunkCoord::new(0, 0), ChunkCoord::new(1, 1));
        let keys: Vec<_> = range.keys().collect();
        assert_eq!(
            keys,
            vec![
                ChunkKey::new(0, 0),
                ChunkKey::new(0, 1),
                ChunkKey::new(1, 0),
                ChunkKey::new(1, 1),
            ]
        );
    }
}
