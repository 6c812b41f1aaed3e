use image::{Rgba, RgbaImage};
use tilecanvas_core::raster::{BLACK, TRANSPARENT};
use tilecanvas_core::{
    CanvasConfig, ChunkImage, ChunkKey, InfiniteCanvas, PixelRect, Point, RasterImage,
    RasterSurface, RenderSurface,
};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn canvas(size: u32, chunk: u32) -> InfiniteCanvas<RasterSurface> {
    InfiniteCanvas::new(
        RasterSurface::new(size, size),
        CanvasConfig::new(chunk, chunk, false),
    )
    .unwrap()
}

/// Clear the live surface then pan, the way an interactive host does.
fn pan_to(canvas: &mut InfiniteCanvas<RasterSurface>, x: i64, y: i64) {
    canvas.surface_mut().clear();
    canvas.move_to(x, y, true).unwrap();
}

#[test]
fn test_drawing_survives_panning_away_and_back() {
    let mut canvas = canvas(100, 50);
    canvas
        .surface_mut()
        .fill_rect(PixelRect::new(60, 10, 10, 10), RED);

    let stats = canvas.update_chunks().unwrap();
    assert_eq!(stats.processed, 4);

    pan_to(&mut canvas, 500, 500);
    assert_eq!(canvas.surface().pixel(65, 15), Some(TRANSPARENT));

    pan_to(&mut canvas, 0, 0);
    assert_eq!(canvas.surface().pixel(65, 15), Some(RED));
    assert_eq!(canvas.surface().pixel(60, 10), Some(RED));
    assert_eq!(canvas.surface().pixel(59, 15), Some(TRANSPARENT));
    assert_eq!(canvas.surface().pixel(70, 20), Some(TRANSPARENT));
}

#[test]
fn test_drawing_with_offset_camera_lands_in_world_space() {
    let mut canvas = canvas(100, 50);
    canvas.move_to(25, 25, true).unwrap();
    // live (0, 0) is world (25, 25), inside the part of chunk (0, 0) that straddles the edge
    canvas.surface_mut().fill_rect(PixelRect::new(0, 0, 2, 2), RED);
    // live (80, 80) is world (105, 105), chunk (2, 2)
    canvas.surface_mut().fill_rect(PixelRect::new(80, 80, 2, 2), BLUE);
    canvas.update_chunks().unwrap();

    let origin = canvas.all_chunks()[&ChunkKey::new(0, 0)].pixels().unwrap();
    assert_eq!(*origin.get_pixel(25, 25), RED);
    assert_eq!(*origin.get_pixel(24, 24), TRANSPARENT);
    let far = canvas.all_chunks()[&ChunkKey::new(2, 2)].pixels().unwrap();
    assert_eq!(*far.get_pixel(5, 5), BLUE);

    pan_to(&mut canvas, 0, 0);
    assert_eq!(canvas.surface().pixel(25, 25), Some(RED));
    assert_eq!(canvas.surface().pixel(26, 26), Some(RED));
    assert_eq!(canvas.surface().pixel(0, 0), Some(TRANSPARENT));
}

#[test]
fn test_load_chunk_renders_at_render_coordinates() {
    let mut canvas = canvas(100, 50);
    canvas.move_to(-25, -25, false).unwrap();

    let seed = RasterImage::from_pixels(RgbaImage::from_pixel(50, 50, BLUE)).unwrap();
    canvas.load_chunk_by_id("-1, -1", seed).unwrap();

    assert_eq!(
        canvas
            .grid()
            .chunk_to_render(ChunkKey::new(-1, -1).coord(), canvas.position()),
        Point::new(-25, -25)
    );
    assert_eq!(canvas.surface().pixel(0, 0), Some(BLUE));
    assert_eq!(canvas.surface().pixel(24, 24), Some(BLUE));
    assert_eq!(canvas.surface().pixel(25, 25), Some(TRANSPARENT));
}

#[test]
fn test_refresh_twice_is_idempotent() {
    let mut canvas = canvas(100, 50);
    canvas.move_to(13, -7, true).unwrap();
    canvas
        .surface_mut()
        .fill_rect(PixelRect::new(30, 30, 40, 40), RED);

    canvas.move_by(0, 0, true).unwrap();
    canvas.update_chunks().unwrap();
    let visible_once: Vec<_> = canvas.chunks_in_viewport().into_keys().collect();
    let chunks_once = canvas.all_chunks().clone();

    canvas.move_by(0, 0, true).unwrap();
    canvas.update_chunks().unwrap();
    let visible_twice: Vec<_> = canvas.chunks_in_viewport().into_keys().collect();

    assert_eq!(visible_once, visible_twice);
    assert_eq!(canvas.all_chunks(), &chunks_once);
}

#[test]
fn test_loading_chunk_is_skipped_until_ready() {
    let mut canvas = canvas(100, 50);
    let png = RasterImage::from_pixels(RgbaImage::from_pixel(50, 50, BLUE))
        .unwrap()
        .png()
        .unwrap()
        .to_vec();

    canvas
        .load_chunk(ChunkKey::new(0, 0), RasterImage::loading(png.clone(), 50, 50))
        .unwrap();
    assert_eq!(canvas.surface().pixel(10, 10), Some(TRANSPARENT));

    // a composite pass leaves the pending chunk alone
    let stats = canvas.update_chunks().unwrap();
    assert_eq!(stats.not_ready, 1);
    assert!(!canvas.all_chunks()[&ChunkKey::new(0, 0)].is_ready());

    let mut loaded = RasterImage::loading(png, 50, 50);
    loaded.finish_loading().unwrap();
    canvas.load_chunk(ChunkKey::new(0, 0), loaded).unwrap();
    assert_eq!(canvas.surface().pixel(10, 10), Some(BLUE));
}

#[test]
fn test_debug_mode_from_json_decorates_chunks() {
    let config =
        CanvasConfig::from_json(r#"{"chunkWidth": 32, "chunkHeight": 32, "debugMode": true}"#)
            .unwrap();
    let mut canvas = InfiniteCanvas::new(RasterSurface::new(64, 64), config).unwrap();
    canvas.update_chunks().unwrap();

    assert_eq!(canvas.all_chunks().len(), 4);
    for image in canvas.all_chunks().values() {
        let pixels = image.pixels().unwrap();
        assert_eq!(*pixels.get_pixel(0, 0), BLACK);
        assert_eq!(*pixels.get_pixel(31, 31), BLACK);
    }

    canvas.refresh().unwrap();
    assert_eq!(canvas.surface().pixel(31, 0), Some(BLACK));
    assert_eq!(canvas.surface().pixel(32, 0), Some(BLACK));
}

#[test]
fn test_seed_layout_tiles_images() {
    let mut canvas = canvas(200, 50);
    for index in 0..6 {
        let key = ChunkKey::seed_layout(index, 4);
        let image = RasterImage::from_pixels(RgbaImage::from_pixel(50, 50, BLUE)).unwrap();
        canvas.load_chunk(key, image).unwrap();
    }

    assert!(canvas.all_chunks().contains_key(&ChunkKey::new(3, 0)));
    assert!(canvas.all_chunks().contains_key(&ChunkKey::new(1, 1)));
    assert_eq!(canvas.surface().pixel(175, 25), Some(BLUE));
    assert_eq!(canvas.surface().pixel(75, 75), Some(BLUE));
    assert_eq!(canvas.surface().pixel(125, 75), Some(TRANSPARENT));
}

#[test]
fn test_panning_to_the_edge_of_the_world() {
    let mut canvas = canvas(100, 50);
    canvas.move_to(i64::MAX - 10, 0, true).unwrap();
    canvas
        .surface_mut()
        .fill_rect(PixelRect::new(5, 5, 2, 2), RED);
    canvas.update_chunks().unwrap();

    canvas.move_by(1_000_000, 0, false).unwrap();
    assert_eq!(canvas.position(), Point::new(i64::MAX, 0));

    pan_to(&mut canvas, i64::MAX - 10, 0);
    assert_eq!(canvas.surface().pixel(5, 5), Some(RED));
    assert_eq!(canvas.surface().pixel(4, 4), Some(TRANSPARENT));
}
