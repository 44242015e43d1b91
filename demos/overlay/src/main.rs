use argh::FromArgs;
use std::cell::RefCell;

use patchwork::accel::{Accelerator, AcceleratorError};
use patchwork::image::Image;
use patchwork::mask::MaskExtractor;
use patchwork::{Pipeline, Raster};

#[derive(FromArgs)]
/// Scale, rotate and place a synthetic patch on a synthetic background
struct Args {
    /// uniform scale factor applied to the patch
    #[argh(option, default = "2.0")]
    scale: f64,

    /// rotation in degrees, counter-clockwise
    #[argh(option, default = "45.0")]
    angle: f32,

    /// horizontal offset of the patch on the canvas
    #[argh(option, default = "50")]
    dx: i64,

    /// vertical offset of the patch on the canvas
    #[argh(option, default = "50")]
    dy: i64,

    /// brightness offset applied through the software accelerator
    #[argh(option, default = "0")]
    brightness: i32,

    /// contrast gain applied through the software accelerator
    #[argh(option, default = "1.0")]
    contrast: f64,

    /// use the content-aware mask extractor instead of the fast one
    #[argh(switch)]
    content_aware: bool,
}

/// A CPU stand-in for an external accelerator.
struct SoftwareAccelerator;

struct SoftwareHandle {
    pixels: RefCell<Vec<u8>>,
    shape: (usize, usize, usize),
}

impl Accelerator for SoftwareAccelerator {
    type Handle = SoftwareHandle;

    fn create(
        &self,
        buffer: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        _use_accelerator: bool,
    ) -> Result<SoftwareHandle, AcceleratorError> {
        if buffer.len() != width * height * channels {
            return Err(AcceleratorError::CreateFailed(width, height, channels));
        }
        Ok(SoftwareHandle {
            pixels: RefCell::new(buffer.to_vec()),
            shape: (width, height, channels),
        })
    }

    fn destroy(&self, _handle: SoftwareHandle) {}

    fn adjust_brightness_contrast(
        &self,
        handle: &SoftwareHandle,
        brightness: i32,
        contrast: f64,
    ) -> i32 {
        let channels = handle.shape.2;
        for (i, v) in handle.pixels.borrow_mut().iter_mut().enumerate() {
            // leave alpha alone
            if channels == 4 && i % 4 == 3 {
                continue;
            }
            *v = (*v as f64 * contrast + brightness as f64).round().clamp(0.0, 255.0) as u8;
        }
        0
    }

    fn fetch(&self, handle: &SoftwareHandle) -> Result<Raster, AcceleratorError> {
        let (width, height, channels) = handle.shape;
        Raster::from_raw(width, height, channels, handle.pixels.borrow().clone())
            .map_err(|e| AcceleratorError::InvalidOutput(e.to_string()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // a flat colored background and a patch with a disk on it
    let background = Image::<u8, 3>::from_size_pixel([200, 200].into(), [40, 90, 160])?;
    let mut patch = Image::<u8, 3>::from_size_pixel([50, 50].into(), [90, 200, 120])?;
    for y in 0..50 {
        for x in 0..50 {
            let (cx, cy) = (x as f32 - 24.5, y as f32 - 24.5);
            if cx * cx + cy * cy <= 18.0 * 18.0 {
                for (c, v) in [120, 20, 200].into_iter().enumerate() {
                    patch.set_pixel(x, y, c, v)?;
                }
            }
        }
    }

    let mut pipeline = Pipeline::new();
    pipeline
        .load_background(Raster::from(background))?
        .load_foreground(Raster::from(patch))?
        .adjust_brightness_contrast(&SoftwareAccelerator, args.brightness, args.contrast, false)?
        .scale(args.scale, args.scale)?
        .rotate(args.angle)?
        .translate(args.dx, args.dy)?;

    let extractor = if args.content_aware {
        MaskExtractor::content_aware()
    } else {
        MaskExtractor::fast()
    };

    if let Some(patch) = pipeline.patch() {
        println!(
            "patch: {}x{}x{}",
            patch.width(),
            patch.height(),
            patch.num_channels()
        );
    }
    let placement = pipeline.placement();
    println!("placement: ({}, {})", placement.x, placement.y);

    let canvas = pipeline
        .canvas()
        .map(|c| c.as_bytes().to_vec())
        .unwrap_or_default();
    let composed = pipeline.materialize(&extractor)?;
    let channels = composed.num_channels();
    let changed = composed
        .as_bytes()
        .chunks_exact(channels)
        .zip(canvas.chunks_exact(channels))
        .filter(|(a, b)| a != b)
        .count();

    log::info!("composed with {extractor:?}");
    println!(
        "composite: {}x{}, {} pixels replaced",
        composed.width(),
        composed.height(),
        changed
    );

    Ok(())
}
