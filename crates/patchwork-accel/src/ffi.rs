use std::ffi::{c_double, c_int, c_void};
use std::ptr::NonNull;

use patchwork_image::{ImageSize, Raster};

use crate::{Accelerator, AcceleratorError};

/// `create(data, width, height, channels, use_gpu) -> handle`, null on failure.
pub type CreateFn = unsafe extern "C" fn(
    data: *const u8,
    width: c_int,
    height: c_int,
    channels: u8,
    use_gpu: bool,
) -> *mut c_void;

/// `destroy(handle)`.
pub type DestroyFn = unsafe extern "C" fn(handle: *mut c_void);

/// `adjust_brightness_contrast(handle, brightness, contrast) -> status`.
pub type AdjustBrightnessContrastFn =
    unsafe extern "C" fn(handle: *mut c_void, brightness: c_int, contrast: c_double) -> c_int;

/// `get_processed_image(handle, &data, &width, &height, &channels) -> status`.
///
/// The returned buffer stays owned by the backend and is valid until the next
/// call on the same handle.
pub type FetchFn = unsafe extern "C" fn(
    handle: *mut c_void,
    data: *mut *const u8,
    width: *mut c_int,
    height: *mut c_int,
    channels: *mut c_int,
) -> c_int;

/// The entry points exported by a foreign acceleration library.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ForeignAcceleratorTable {
    /// Creates a handle from a pixel buffer.
    pub create: CreateFn,
    /// Destroys a handle.
    pub destroy: DestroyFn,
    /// Brightness and contrast adjustment.
    pub adjust_brightness_contrast: AdjustBrightnessContrastFn,
    /// Reads back the processed image.
    pub get_processed_image: FetchFn,
}

/// Opaque, non-null handle returned by a foreign library.
#[derive(Debug, PartialEq, Eq)]
pub struct RawHandle(NonNull<c_void>);

impl RawHandle {
    /// The raw pointer passed back to the library.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// An [`Accelerator`] backed by a table of C function pointers.
#[derive(Clone, Copy, Debug)]
pub struct ForeignAccelerator {
    table: ForeignAcceleratorTable,
}

impl ForeignAccelerator {
    /// Wrap a table of foreign entry points.
    ///
    /// # Safety
    ///
    /// Every function in `table` must follow the documented contract of its
    /// type and be safe to call for as long as the returned value lives.
    pub unsafe fn new(table: ForeignAcceleratorTable) -> Self {
        Self { table }
    }
}

fn to_c_int(value: usize) -> Result<c_int, AcceleratorError> {
    c_int::try_from(value)
        .map_err(|_| AcceleratorError::InvalidOutput(format!("dimension {value} overflows c_int")))
}

impl Accelerator for ForeignAccelerator {
    type Handle = RawHandle;

    fn create(
        &self,
        buffer: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        use_accelerator: bool,
    ) -> Result<RawHandle, AcceleratorError> {
        let channels_u8 = u8::try_from(channels)
            .map_err(|_| AcceleratorError::CreateFailed(width, height, channels))?;
        let expected = ImageSize { width, height }.checked_len(channels);
        if expected != Some(buffer.len()) {
            return Err(AcceleratorError::CreateFailed(width, height, channels));
        }

        // SAFETY: the buffer holds width * height * channels bytes and the
        // library copies it before returning.
        let ptr = unsafe {
            (self.table.create)(
                buffer.as_ptr(),
                to_c_int(width)?,
                to_c_int(height)?,
                channels_u8,
                use_accelerator,
            )
        };

        NonNull::new(ptr)
            .map(RawHandle)
            .ok_or(AcceleratorError::CreateFailed(width, height, channels))
    }

    fn destroy(&self, handle: RawHandle) {
        // SAFETY: the handle was produced by `create` and is consumed here.
        unsafe { (self.table.destroy)(handle.as_ptr()) }
    }

    fn adjust_brightness_contrast(
        &self,
        handle: &RawHandle,
        brightness: i32,
        contrast: f64,
    ) -> i32 {
        // SAFETY: the handle is live until `destroy`.
        unsafe { (self.table.adjust_brightness_contrast)(handle.as_ptr(), brightness, contrast) }
    }

    fn fetch(&self, handle: &RawHandle) -> Result<Raster, AcceleratorError> {
        let mut data: *const u8 = std::ptr::null();
        let (mut width, mut height, mut channels): (c_int, c_int, c_int) = (0, 0, 0);

        // SAFETY: all out pointers reference valid locals.
        let code = unsafe {
            (self.table.get_processed_image)(
                handle.as_ptr(),
                &mut data,
                &mut width,
                &mut height,
                &mut channels,
            )
        };

        if code != 0 {
            log::warn!("get_processed_image returned status {code}");
            return Err(AcceleratorError::Status {
                op: "get_processed_image",
                code,
            });
        }

        let (Ok(w), Ok(h), Ok(c)) = (
            usize::try_from(width),
            usize::try_from(height),
            usize::try_from(channels),
        ) else {
            return Err(AcceleratorError::InvalidOutput(format!(
                "negative dimensions {width}x{height}x{channels}"
            )));
        };

        let size = ImageSize {
            width: w,
            height: h,
        };
        if size.is_empty() || c == 0 {
            return Err(AcceleratorError::InvalidOutput(format!(
                "empty image {w}x{h}x{c}"
            )));
        }
        let len = size.checked_len(c).ok_or_else(|| {
            AcceleratorError::InvalidOutput(format!("image {w}x{h}x{c} is too large"))
        })?;
        if data.is_null() {
            return Err(AcceleratorError::InvalidOutput("null pixel buffer".into()));
        }

        // SAFETY: the library guarantees `len` readable bytes at `data`
        // until the next call on this handle; they are copied out here.
        let pixels = unsafe { std::slice::from_raw_parts(data, len) }.to_vec();

        Raster::from_raw(w, h, c, pixels)
            .map_err(|e| AcceleratorError::InvalidOutput(e.to_string()))
    }
}
