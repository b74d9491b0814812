use crate::core::constants::TILE_SIZE;
use crate::core::types::{PixelCoordinate, TileAddress};
use crate::raster::line::rasterize_line;
use crate::util::error::RoadTilesError;
use geo_types::LineString;

/// A `TILE_SIZE x TILE_SIZE` binary road label for one tile.
///
/// Cells are stored row-major (`y * TILE_SIZE + x`), the same layout as a
/// decoded raster tile, with `1` marking road and `0` everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMatrix {
    cells: Vec<u8>,
}

impl TileMatrix {
    /// Returns an all-zero matrix.
    pub fn empty() -> Self {
        Self {
            cells: vec![0; TILE_SIZE * TILE_SIZE],
        }
    }

    /// Edge length in cells.
    pub fn size(&self) -> usize {
        TILE_SIZE
    }

    /// Returns the cell at a tile-local pixel, or `None` off the tile.
    pub fn get(&self, pixel: PixelCoordinate) -> Option<u8> {
        pixel
            .is_on_tile()
            .then(|| self.cells[pixel.y as usize * TILE_SIZE + pixel.x as usize])
    }

    /// Returns `true` if the pixel is marked as road.
    pub fn is_set(&self, pixel: PixelCoordinate) -> bool {
        self.get(pixel) == Some(1)
    }

    /// Number of road cells.
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Iterates the road cells in row-major order.
    pub fn set_pixels(&self) -> impl Iterator<Item = PixelCoordinate> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &c)| {
            (c == 1).then(|| PixelCoordinate::new((i % TILE_SIZE) as i64, (i / TILE_SIZE) as i64))
        })
    }

    /// Row-major cell buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Renders one text line per row, `1` for road and `0` otherwise.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(TILE_SIZE * (TILE_SIZE + 1));
        for row in self.cells.chunks(TILE_SIZE) {
            out.extend(row.iter().map(|&c| if c == 1 { '1' } else { '0' }));
            out.push('\n');
        }
        out
    }

    fn mark(&mut self, pixel: &PixelCoordinate) {
        if pixel.is_on_tile() {
            self.cells[pixel.y as usize * TILE_SIZE + pixel.x as usize] = 1;
        }
    }
}

impl Default for TileMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

/// Marks every pixel of a rasterized line in `matrix`.
///
/// Cells only ever go from 0 to 1, so applying lines in any order or more
/// than once gives the same matrix.
pub fn add_line<'a>(
    mut matrix: TileMatrix,
    pixels: impl IntoIterator<Item = &'a PixelCoordinate>,
) -> TileMatrix {
    for pixel in pixels {
        matrix.mark(pixel);
    }
    matrix
}

/// Lifecycle of a label matrix while lines are being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// No line added yet.
    Empty,
    /// At least one line added.
    Accumulating,
}

/// Accumulates the lines of one tile into its [`TileMatrix`].
///
/// The builder owns the tile it draws on, so every line is clipped against
/// the same origin. [`build`](Self::build) finalizes the matrix.
///
/// # Example
/// ```
/// use roadtiles::{TileAddress, TileMatrixBuilder};
/// use geo_types::LineString;
///
/// # fn main() -> Result<(), roadtiles::RoadTilesError> {
/// let tile = TileAddress::new(686, 1583, 12);
/// let road = LineString::from(vec![(-119.69, 37.77), (-119.64, 37.73)]);
///
/// let mut builder = TileMatrixBuilder::new(tile);
/// builder.add_line(&road)?;
/// let matrix = builder.build();
/// assert!(matrix.count_set() > 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TileMatrixBuilder {
    tile: TileAddress,
    matrix: TileMatrix,
    lines: usize,
}

impl TileMatrixBuilder {
    pub fn new(tile: TileAddress) -> Self {
        Self {
            tile,
            matrix: TileMatrix::empty(),
            lines: 0,
        }
    }

    pub fn tile(&self) -> &TileAddress {
        &self.tile
    }

    pub fn state(&self) -> BuildState {
        if self.lines == 0 {
            BuildState::Empty
        } else {
            BuildState::Accumulating
        }
    }

    /// Number of lines drawn so far, including fully clipped ones.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Rasterizes a geographic line onto this builder's tile.
    pub fn add_line(&mut self, line: &LineString<f64>) -> Result<&mut Self, RoadTilesError> {
        let pixels = rasterize_line(line, &self.tile)?;
        self.add_pixels(&pixels);
        Ok(self)
    }

    /// Marks already rasterized tile-local pixels.
    pub fn add_pixels<'a>(
        &mut self,
        pixels: impl IntoIterator<Item = &'a PixelCoordinate>,
    ) -> &mut Self {
        let matrix = std::mem::take(&mut self.matrix);
        self.matrix = add_line(matrix, pixels);
        self.lines += 1;
        self
    }

    pub fn build(self) -> TileMatrix {
        self.matrix
    }
}
