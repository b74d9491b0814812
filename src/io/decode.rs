use crate::util::error::RoadTilesError;

/// Decoded RGB raster tile, row-major with shape `(height, width, 3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPixels {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterPixels {
    pub const CHANNELS: usize = 3;

    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RoadTilesError> {
        if data.len() != width * height * Self::CHANNELS {
            return Err(RoadTilesError::ImageDecodeError(format!(
                "Expected {} bytes for {}x{} RGB, got {}",
                width * height * Self::CHANNELS,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, Self::CHANNELS)
    }

    /// RGB value at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * Self::CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Decodes a JPEG or PNG raster payload into RGB pixels.
///
/// Grayscale and alpha images are converted to three channels.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterPixels, RoadTilesError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| RoadTilesError::ImageDecodeError(e.to_string()))?
        .to_rgb8();

    let (width, height) = (image.width() as usize, image.height() as usize);
    RasterPixels::new(width, height, image.into_raw())
}
