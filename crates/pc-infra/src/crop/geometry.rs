//! Pure geometry helpers for the crop widget.

use image::DynamicImage;

use pc_core::profile_image::Viewport;
use pc_core::RegionConfig;

/// Orientation value meaning "as decoded".
pub const DEFAULT_ORIENTATION: u8 = 1;

/// Apply an EXIF-style orientation (1..=8). Unknown values leave the image
/// untouched.
pub fn apply_orientation(image: &DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image.clone(),
    }
}

/// Largest region centred on the image with the viewport's aspect ratio.
pub fn cover_region(
    image_width: u32,
    image_height: u32,
    viewport: &Viewport,
    orientation: u8,
) -> RegionConfig {
    let (vw, vh) = (u64::from(viewport.width.max(1)), u64::from(viewport.height.max(1)));
    let (w, h) = (u64::from(image_width), u64::from(image_height));

    let (region_w, region_h) = if w * vh >= h * vw {
        ((h * vw / vh).max(1).min(w), h)
    } else {
        (w, (w * vh / vw).max(1).min(h))
    };
    let x1 = (w - region_w) / 2;
    let y1 = (h - region_h) / 2;

    let zoom = if region_w == 0 {
        1.0
    } else {
        vw as f64 / region_w as f64
    };

    RegionConfig::new(
        [
            x1 as u32,
            y1 as u32,
            (x1 + region_w) as u32,
            (y1 + region_h) as u32,
        ],
        zoom,
        orientation,
    )
}

/// Clamp region points to the image bounds and order them.
///
/// Returns `None` when nothing of the region remains.
pub fn clamp_region(
    region: &RegionConfig,
    image_width: u32,
    image_height: u32,
) -> Option<RegionConfig> {
    let [a, b, c, d] = region.points;
    let x1 = a.min(c).min(image_width);
    let x2 = a.max(c).min(image_width);
    let y1 = b.min(d).min(image_height);
    let y2 = b.max(d).min(image_height);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(RegionConfig::new(
        [x1, y1, x2, y2],
        region.zoom,
        region.orientation,
    ))
}

/// Whether a pixel lies outside the ellipse inscribed in a `width`×`height`
/// rectangle.
pub fn outside_inscribed_circle(x: u32, y: u32, width: u32, height: u32) -> bool {
    let rx = width as f64 / 2.0;
    let ry = height as f64 / 2.0;
    if rx == 0.0 || ry == 0.0 {
        return true;
    }
    let dx = (x as f64 + 0.5 - rx) / rx;
    let dy = (y as f64 + 0.5 - ry) / ry;
    dx * dx + dy * dy > 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::ViewportShape;

    fn square_viewport() -> Viewport {
        Viewport {
            width: 199,
            height: 199,
            shape: ViewportShape::Circle,
        }
    }

    #[test]
    fn cover_region_centres_square_in_landscape_image() {
        let region = cover_region(40, 20, &square_viewport(), 1);

        assert_eq!(region.points, [10, 0, 30, 20]);
        assert!((region.zoom - 9.95).abs() < 1e-9);
        assert_eq!(region.orientation, 1);
    }

    #[test]
    fn cover_region_centres_square_in_portrait_image() {
        let region = cover_region(20, 50, &square_viewport(), 6);

        assert_eq!(region.points, [0, 15, 20, 35]);
        assert_eq!(region.orientation, 6);
    }

    #[test]
    fn clamp_region_orders_and_bounds_points() {
        let region = RegionConfig::new([30, 25, 5, 0], 2.0, 1);

        let clamped = clamp_region(&region, 20, 20).unwrap();

        assert_eq!(clamped.points, [5, 0, 20, 20]);
        assert_eq!(clamped.zoom, 2.0);
    }

    #[test]
    fn clamp_region_rejects_region_outside_image() {
        let region = RegionConfig::new([50, 50, 60, 60], 1.0, 1);
        assert!(clamp_region(&region, 20, 20).is_none());
    }

    #[test]
    fn orientation_six_swaps_dimensions() {
        let image = DynamicImage::new_rgba8(40, 20);

        let rotated = apply_orientation(&image, 6);

        assert_eq!((rotated.width(), rotated.height()), (20, 40));
        assert_eq!(apply_orientation(&image, 3).width(), 40);
    }

    #[test]
    fn circle_mask_keeps_centre_and_drops_corners() {
        assert!(!outside_inscribed_circle(10, 10, 20, 20));
        assert!(outside_inscribed_circle(0, 0, 20, 20));
        assert!(outside_inscribed_circle(19, 19, 20, 20));
    }
}
