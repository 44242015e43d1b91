use crate::{Image, ImageError, ImageSize};

/// An 8-bit raster whose channel count is only known at runtime.
///
/// This is the opaque value exchanged with callers of the pipeline: a pixel
/// buffer plus width, height and channel count. Three-channel rasters are
/// interpreted as BGR and four-channel rasters as BGRA.
#[derive(Clone, Debug, PartialEq)]
pub enum Raster {
    /// Single channel intensity.
    Gray(Image<u8, 1>),
    /// Blue, green, red.
    Bgr(Image<u8, 3>),
    /// Blue, green, red, alpha.
    Bgra(Image<u8, 4>),
}

impl Raster {
    /// Build a raster from a raw interleaved buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedChannelLayout`] when `channels` is not
    /// one of 1, 3 or 4, and [`ImageError::InvalidChannelShape`] when the
    /// buffer length does not match `width * height * channels`.
    ///
    /// # Example
    ///
    /// ```
    /// use patchwork_image::Raster;
    ///
    /// let raster = Raster::from_raw(2, 2, 3, vec![0u8; 12]).unwrap();
    /// assert_eq!(raster.num_channels(), 3);
    /// assert!(Raster::from_raw(2, 2, 2, vec![0u8; 8]).is_err());
    /// ```
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let size = ImageSize { width, height };
        match channels {
            1 => Ok(Raster::Gray(Image::new(size, data)?)),
            3 => Ok(Raster::Bgr(Image::new(size, data)?)),
            4 => Ok(Raster::Bgra(Image::new(size, data)?)),
            n => Err(ImageError::UnsupportedChannelLayout(n)),
        }
    }

    /// Consume the raster and return `(buffer, width, height, channels)`.
    pub fn into_raw(self) -> (Vec<u8>, usize, usize, usize) {
        let (size, channels) = (self.size(), self.num_channels());
        let data = match self {
            Raster::Gray(img) => img.into_vec(),
            Raster::Bgr(img) => img.into_vec(),
            Raster::Bgra(img) => img.into_vec(),
        };
        (data, size.width, size.height, channels)
    }

    /// Get the size of the raster in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            Raster::Gray(img) => img.size(),
            Raster::Bgr(img) => img.size(),
            Raster::Bgra(img) => img.size(),
        }
    }

    /// Get the width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Get the number of interleaved channels.
    pub fn num_channels(&self) -> usize {
        match self {
            Raster::Gray(_) => 1,
            Raster::Bgr(_) => 3,
            Raster::Bgra(_) => 4,
        }
    }

    /// Borrow the interleaved pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Raster::Gray(img) => img.as_slice(),
            Raster::Bgr(img) => img.as_slice(),
            Raster::Bgra(img) => img.as_slice(),
        }
    }
}

impl From<Image<u8, 1>> for Raster {
    fn from(image: Image<u8, 1>) -> Self {
        Raster::Gray(image)
    }
}

impl From<Image<u8, 3>> for Raster {
    fn from(image: Image<u8, 3>) -> Self {
        Raster::Bgr(image)
    }
}

impl From<Image<u8, 4>> for Raster {
    fn from(image: Image<u8, 4>) -> Self {
        Raster::Bgra(image)
    }
}

#[cfg(test)]
mod tests {
    use super::Raster;
    use crate::ImageError;

    #[test]
    fn raster_from_raw_layouts() -> Result<(), ImageError> {
        assert_eq!(Raster::from_raw(3, 2, 1, vec![0; 6])?.num_channels(), 1);
        assert_eq!(Raster::from_raw(3, 2, 3, vec![0; 18])?.num_channels(), 3);
        assert_eq!(Raster::from_raw(3, 2, 4, vec![0; 24])?.num_channels(), 4);
        Ok(())
    }

    #[test]
    fn raster_unsupported_layout() {
        assert_eq!(
            Raster::from_raw(1, 1, 2, vec![0; 2]),
            Err(ImageError::UnsupportedChannelLayout(2))
        );
        assert_eq!(
            Raster::from_raw(1, 1, 5, vec![0; 5]),
            Err(ImageError::UnsupportedChannelLayout(5))
        );
    }

    #[test]
    fn raster_size_overflow() {
        assert_eq!(
            Raster::from_raw(usize::MAX, 2, 3, vec![]),
            Err(ImageError::ImageSizeOverflow(usize::MAX, 2, 3))
        );
    }

    #[test]
    fn raster_into_raw() -> Result<(), ImageError> {
        let raster = Raster::from_raw(2, 1, 3, vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(raster.as_bytes().len(), 6);
        let (data, width, height, channels) = raster.into_raw();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!((width, height, channels), (2, 1, 3));
        Ok(())
    }
}
