use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use tracing::{debug, info};

use pc_core::ports::{CropWidgetError, CropWidgetPort};
use pc_core::{
    EncodedImage, ImageEncoding, ImageSource, RegionConfig, RenderRequest, WidgetHandle,
    WidgetOptions,
};

use super::geometry::{
    apply_orientation, clamp_region, cover_region, outside_inscribed_circle, DEFAULT_ORIENTATION,
};

/// Decoded image bound to a surface.
struct BoundImage {
    original: Arc<DynamicImage>,
    /// `original` with the region's orientation applied.
    oriented: Arc<DynamicImage>,
    region: RegionConfig,
}

struct Surface {
    options: WidgetOptions,
    bound: Option<BoundImage>,
}

/// Crop widget backed by the `image` crate.
///
/// Every handle owns one decoded image. Decoding and rendering run on the
/// blocking thread pool.
///
/// 基于 `image` crate 的裁剪控件。
#[derive(Default)]
pub struct ImageCropWidget {
    next_id: AtomicU64,
    surfaces: Mutex<HashMap<WidgetHandle, Surface>>,
}

impl ImageCropWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles not yet destroyed.
    pub fn live_handles(&self) -> usize {
        self.surfaces().map(|surfaces| surfaces.len()).unwrap_or(0)
    }

    fn surfaces(&self) -> Result<MutexGuard<'_, HashMap<WidgetHandle, Surface>>, CropWidgetError> {
        self.surfaces
            .lock()
            .map_err(|_| CropWidgetError::Unavailable)
    }

    fn options(&self, handle: WidgetHandle) -> Result<WidgetOptions, CropWidgetError> {
        self.surfaces()?
            .get(&handle)
            .map(|surface| surface.options)
            .ok_or(CropWidgetError::UnknownHandle(handle))
    }
}

fn decode_source(source: &ImageSource) -> Result<DynamicImage, CropWidgetError> {
    let bytes = source
        .decode()
        .map_err(|err| CropWidgetError::InvalidSource(err.to_string()))?;
    image::load_from_memory(&bytes).map_err(|err| {
        CropWidgetError::UnsupportedImage(format!("{} ({})", err, source.mime_type))
    })
}

/// Fit a region to an image: clamp a replayed one, or pick the cover fit.
fn fit_region(
    image: &DynamicImage,
    options: &WidgetOptions,
    replay: Option<&RegionConfig>,
) -> Result<RegionConfig, CropWidgetError> {
    match replay {
        Some(region) => clamp_region(region, image.width(), image.height()).ok_or_else(|| {
            CropWidgetError::InvalidRegion(format!(
                "points {:?} outside {}x{} image",
                region.points,
                image.width(),
                image.height()
            ))
        }),
        None => Ok(cover_region(
            image.width(),
            image.height(),
            &options.viewport,
            DEFAULT_ORIENTATION,
        )),
    }
}

/// JPEG has no alpha channel; transparent pixels are blended onto this colour.
const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Composite `pixels` over a solid `background`.
fn flatten_onto(pixels: &RgbaImage, background: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |fg: u8, bg: u8| {
            ((u16::from(fg) * alpha + u16::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

fn render(
    image: &DynamicImage,
    region: &RegionConfig,
    options: &WidgetOptions,
    request: RenderRequest,
) -> Result<EncodedImage, CropWidgetError> {
    let [x1, y1, _, _] = region.points;
    let cropped = image.crop_imm(x1, y1, region.width(), region.height());
    let (width, height) = (options.viewport.width, options.viewport.height);
    let mut pixels = cropped
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8();

    if request.circle {
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            if outside_inscribed_circle(x, y, width, height) {
                pixel[3] = 0;
            }
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    let written = match request.encoding {
        ImageEncoding::Png => {
            DynamicImage::ImageRgba8(pixels).write_to(&mut buffer, ImageFormat::Png)
        }
        ImageEncoding::Jpeg => {
            DynamicImage::ImageRgb8(flatten_onto(&pixels, JPEG_BACKGROUND))
                .write_to(&mut buffer, ImageFormat::Jpeg)
        }
    };
    written.map_err(|err| CropWidgetError::Render(err.to_string()))?;

    Ok(EncodedImage::from_bytes(
        request.encoding.mime_type(),
        buffer.get_ref(),
    ))
}

#[async_trait]
impl CropWidgetPort for ImageCropWidget {
    fn initialize(&self, options: &WidgetOptions) -> Result<WidgetHandle, CropWidgetError> {
        if options.viewport.width == 0 || options.viewport.height == 0 {
            return Err(CropWidgetError::InvalidRegion(
                "viewport must not be empty".to_string(),
            ));
        }

        let handle = WidgetHandle(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.surfaces()?.insert(
            handle,
            Surface {
                options: *options,
                bound: None,
            },
        );
        debug!(handle = %handle, "crop surface created");
        Ok(handle)
    }

    async fn bind(
        &self,
        handle: WidgetHandle,
        source: ImageSource,
        region: Option<RegionConfig>,
    ) -> Result<(), CropWidgetError> {
        let options = self.options(handle)?;

        let bound = tokio::task::spawn_blocking(move || {
            let original = decode_source(&source)?;
            let orientation = region
                .as_ref()
                .map(|r| r.orientation)
                .unwrap_or(DEFAULT_ORIENTATION);
            let oriented = apply_orientation(&original, orientation);
            let fitted = fit_region(&oriented, &options, region.as_ref())?;
            Ok::<_, CropWidgetError>(BoundImage {
                original: Arc::new(original),
                oriented: Arc::new(oriented),
                region: fitted,
            })
        })
        .await
        .map_err(|err| CropWidgetError::UnsupportedImage(err.to_string()))??;

        let mut surfaces = self.surfaces()?;
        let surface = surfaces
            .get_mut(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        info!(
            handle = %handle,
            width = bound.oriented.width(),
            height = bound.oriented.height(),
            points = ?bound.region.points,
            "image bound to crop surface"
        );
        surface.bound = Some(bound);
        Ok(())
    }

    fn region_config(&self, handle: WidgetHandle) -> Result<RegionConfig, CropWidgetError> {
        let surfaces = self.surfaces()?;
        let surface = surfaces
            .get(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        surface
            .bound
            .as_ref()
            .map(|bound| bound.region.clone())
            .ok_or(CropWidgetError::NotBound(handle))
    }

    fn set_region(&self, handle: WidgetHandle, region: RegionConfig) -> Result<(), CropWidgetError> {
        let mut surfaces = self.surfaces()?;
        let surface = surfaces
            .get_mut(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        let options = surface.options;
        let bound = surface
            .bound
            .as_mut()
            .ok_or(CropWidgetError::NotBound(handle))?;

        let oriented = if region.orientation == bound.region.orientation {
            Arc::clone(&bound.oriented)
        } else {
            Arc::new(apply_orientation(&bound.original, region.orientation))
        };
        bound.region = fit_region(&oriented, &options, Some(&region))?;
        bound.oriented = oriented;
        debug!(handle = %handle, points = ?bound.region.points, zoom = bound.region.zoom, "crop region set");
        Ok(())
    }

    async fn render_result(
        &self,
        handle: WidgetHandle,
        request: RenderRequest,
    ) -> Result<EncodedImage, CropWidgetError> {
        let (image, region, options) = {
            let surfaces = self.surfaces()?;
            let surface = surfaces
                .get(&handle)
                .ok_or(CropWidgetError::UnknownHandle(handle))?;
            let bound = surface
                .bound
                .as_ref()
                .ok_or(CropWidgetError::NotBound(handle))?;
            (Arc::clone(&bound.oriented), bound.region.clone(), surface.options)
        };

        let encoded =
            tokio::task::spawn_blocking(move || render(&image, &region, &options, request))
                .await
                .map_err(|err| CropWidgetError::Render(err.to_string()))??;

        info!(handle = %handle, mime_type = %encoded.mime_type, "crop rendered");
        Ok(encoded)
    }

    fn destroy(&self, handle: WidgetHandle) -> Result<(), CropWidgetError> {
        self.surfaces()?
            .remove(&handle)
            .map(|_| debug!(handle = %handle, "crop surface destroyed"))
            .ok_or(CropWidgetError::UnknownHandle(handle))
    }
}
