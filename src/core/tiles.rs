use crate::core::projection::coordinate_to_tile;
use crate::core::types::{BoundingBox, TileAddress};
use crate::util::error::RoadTilesError;

/// Returns the tiles covering `bbox` at `zoom`.
///
/// Both corners are projected and the half-open rectangle
/// `[min_x, max_x) x [min_y, max_y)` is enumerated row by row. A box
/// narrower than one tile on either axis yields no tiles.
pub fn tiles_in_bounding_box(
    bbox: &BoundingBox,
    zoom: u8,
) -> Result<Vec<TileAddress>, RoadTilesError> {
    let ne = coordinate_to_tile(&bbox.northeast, zoom)?;
    let sw = coordinate_to_tile(&bbox.southwest, zoom)?;

    let min_x = ne.x.min(sw.x);
    let max_x = ne.x.max(sw.x);
    let min_y = ne.y.min(sw.y);
    let max_y = ne.y.max(sw.y);

    let capacity = ((max_x - min_x) * (max_y - min_y)) as usize;
    let mut tiles = Vec::with_capacity(capacity);

    for y in min_y..max_y {
        for x in min_x..max_x {
            tiles.push(TileAddress::new(x, y, zoom));
        }
    }

    Ok(tiles)
}

/// The set of tiles covering a region at one zoom level.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: Vec<TileAddress>,
    zoom_level: u8,
}

impl TileGrid {
    pub fn from_bounding_box(bbox: &BoundingBox, zoom_level: u8) -> Result<Self, RoadTilesError> {
        let tiles = tiles_in_bounding_box(bbox, zoom_level)?;
        Ok(Self { tiles, zoom_level })
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[TileAddress] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileAddress> {
        self.tiles.iter()
    }

    pub fn contains(&self, tile: &TileAddress) -> bool {
        self.tiles.contains(tile)
    }
}

impl IntoIterator for TileGrid {
    type Item = TileAddress;
    type IntoIter = std::vec::IntoIter<TileAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Coordinate;
    use std::collections::HashSet;

    fn yosemite() -> BoundingBox {
        BoundingBox::new(
            Coordinate::new(37.81385, -119.48559),
            Coordinate::new(37.66724, -119.72454),
        )
    }

    #[test]
    fn test_world_has_four_pow_zoom_tiles() -> Result<(), RoadTilesError> {
        for zoom in 0..=8u8 {
            let tiles = tiles_in_bounding_box(&BoundingBox::world(), zoom)?;
            assert_eq!(tiles.len(), 4usize.pow(zoom as u32), "zoom {}", zoom);

            let unique: HashSet<_> = tiles.iter().collect();
            assert_eq!(unique.len(), tiles.len());
            assert!(tiles.iter().all(|t| t.is_valid() && t.z == zoom));
        }
        Ok(())
    }

    #[test]
    fn test_yosemite_at_zoom_12() -> Result<(), RoadTilesError> {
        let tiles = tiles_in_bounding_box(&yosemite(), 12)?;
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], TileAddress::new(685, 1582, 12));
        assert_eq!(tiles[5], TileAddress::new(687, 1583, 12));
        Ok(())
    }

    #[test]
    fn test_corner_order_does_not_matter() -> Result<(), RoadTilesError> {
        let bbox = yosemite();
        let swapped = BoundingBox::new(bbox.southwest, bbox.northeast);
        assert_eq!(
            tiles_in_bounding_box(&bbox, 12)?,
            tiles_in_bounding_box(&swapped, 12)?
        );
        Ok(())
    }

    #[test]
    fn test_degenerate_box_is_empty() -> Result<(), RoadTilesError> {
        let point = Coordinate::new(37.7, -119.6);
        let tiles = tiles_in_bounding_box(&BoundingBox::new(point, point), 12)?;
        assert!(tiles.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_zoom_level() {
        let result = tiles_in_bounding_box(&yosemite(), 40);
        assert!(matches!(result, Err(RoadTilesError::InvalidZoomLevel(40))));
    }

    #[test]
    fn test_tile_grid() -> Result<(), RoadTilesError> {
        let grid = TileGrid::from_bounding_box(&yosemite(), 12)?;
        assert_eq!(grid.zoom_level(), 12);
        assert_eq!(grid.len(), 6);
        assert!(!grid.is_empty());
        assert!(grid.contains(&TileAddress::new(686, 1583, 12)));
        assert!(!grid.contains(&TileAddress::new(688, 1583, 12)));
        let borrowed = grid.iter().count();
        assert_eq!(grid.into_iter().count(), borrowed);
        Ok(())
    }
}
