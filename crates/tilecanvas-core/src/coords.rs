//! Coordinate spaces of the infinite canvas.
//!
//! Three spaces are involved:
//! - world space: absolute pixel positions on the unbounded canvas
//! - chunk space: integer positions on the chunk grid (`world / chunk size`, floored)
//! - render space: pixel positions relative to the camera, i.e. on the live surface
//!
//! Everything here is pure; [`ChunkGrid`] only carries the chunk dimensions.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::config::CanvasConfig;
use crate::error::KeyParseError;

/// A pixel position in world or render space.
///
/// Arithmetic saturates at the edges of the `i64` range instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Position of a chunk on the infinite grid.
///
/// Ordered by column first, then row, which is also the order in which
/// viewport chunks are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Identity of a chunk in the [`ChunkStore`](crate::ChunkStore).
///
/// The textual form is `"x, y"`, e.g. `"-2, 7"`. Parsing is strict: anything
/// that was not produced by [`Display`](fmt::Display) is rejected. Serde uses
/// the same textual form.
///
/// # Examples
///
/// ```
/// use tilecanvas_core::{ChunkCoord, ChunkKey};
///
/// let key = ChunkKey::new(-2, 7);
/// assert_eq!(key.to_string(), "-2, 7");
/// assert_eq!("-2, 7".parse::<ChunkKey>().unwrap().coord(), ChunkCoord::new(-2, 7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(ChunkCoord);

const KEY_SEPARATOR: &str = ", ";

impl ChunkKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self(ChunkCoord::new(x, y))
    }

    pub fn coord(&self) -> ChunkCoord {
        self.0
    }

    /// Key of the `index`-th image when tiling a list of images into rows of
    /// `per_row` chunks, starting at the origin.
    ///
    /// A `per_row` of zero is treated as one.
    pub fn seed_layout(index: usize, per_row: usize) -> Self {
        let per_row = per_row.max(1);
        Self::new((index % per_row) as i64, (index / per_row) as i64)
    }
}

impl From<ChunkCoord> for ChunkKey {
    fn from(coord: ChunkCoord) -> Self {
        Self(coord)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0.x, KEY_SEPARATOR, self.0.y)
    }
}

impl FromStr for ChunkKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyParseError::Malformed(s.to_string()))?;
        let component = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| KeyParseError::InvalidComponent {
                    key: s.to_string(),
                    component: part.to_string(),
                })
        };
        Ok(Self::new(component(x)?, component(y)?))
    }
}

impl Serialize for ChunkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChunkKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Build the key of the chunk at `(x, y)`.
pub fn construct_key(x: i64, y: i64) -> ChunkKey {
    ChunkKey::new(x, y)
}

/// Inverse of [`construct_key`] on the textual form.
pub fn parse_key(key: &str) -> Result<ChunkCoord, KeyParseError> {
    key.parse::<ChunkKey>().map(|k| k.coord())
}

/// Conversions between world, chunk and render space for one chunk size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    chunk_width: i64,
    chunk_height: i64,
}

impl ChunkGrid {
    /// Chunk dimensions must be non-zero; [`CanvasConfig::validate`] enforces it.
    pub fn new(chunk_width: u32, chunk_height: u32) -> Self {
        debug_assert!(chunk_width > 0 && chunk_height > 0);
        Self {
            chunk_width: chunk_width as i64,
            chunk_height: chunk_height as i64,
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(config.chunk_width, config.chunk_height)
    }

    pub fn chunk_width(&self) -> i64 {
        self.chunk_width
    }

    pub fn chunk_height(&self) -> i64 {
        self.chunk_height
    }

    /// Chunk containing the world position, using floor division so that
    /// `-1` lands in chunk `-1` rather than `0`.
    pub fn world_to_chunk(&self, x: i64, y: i64) -> ChunkCoord {
        ChunkCoord::new(x.div_euclid(self.chunk_width), y.div_euclid(self.chunk_height))
    }

    /// World position of the chunk's top-left corner.
    pub fn chunk_to_world(&self, coord: ChunkCoord) -> Point {
        Point::new(
            coord.x.saturating_mul(self.chunk_width),
            coord.y.saturating_mul(self.chunk_height),
        )
    }

    /// Position of the chunk's top-left corner on the live surface.
    pub fn chunk_to_render(&self, coord: ChunkCoord, camera: Point) -> Point {
        self.chunk_to_world(coord) - camera
    }
}
