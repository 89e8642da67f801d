//! Geographic coverage builder.
//!
//! Polygon order and point order are preserved exactly as fetched. Rings are not closed,
//! sorted or deduplicated.

use crate::constants::LOCATION_DESCRIPTION_SEPARATOR;
use crate::repository::{BoundingBoxRow, PolygonRow};
use eml::{BoundingCoordinates, GPolygon, GRingPoint, GeographicCoverage};

/// `location_name`, or `location_name - location_description` when a description exists.
pub fn geographic_description(location_name: &str, location_description: Option<&str>) -> String {
    match location_description.filter(|description| !description.is_empty()) {
        Some(description) => {
            format!("{location_name}{LOCATION_DESCRIPTION_SEPARATOR}{description}")
        }
        None => location_name.to_string(),
    }
}

/// Maps a bounding box onto EML bounding coordinates.
///
/// The source box maps west to `xmax`, east to `ymax`, north to `xmin` and south to `ymin`.
/// Downstream consumers already compensate for this mapping, so it must not be corrected here.
pub fn bounding_coordinates(bounding_box: &BoundingBoxRow) -> BoundingCoordinates {
    BoundingCoordinates {
        west: bounding_box.xmax,
        east: bounding_box.ymax,
        north: bounding_box.xmin,
        south: bounding_box.ymin,
    }
}

pub fn build_geographic_coverage(
    description: String,
    bounding_box: Option<&BoundingBoxRow>,
    polygons: &[PolygonRow],
) -> GeographicCoverage {
    GeographicCoverage {
        geographic_description: description,
        bounding_coordinates: bounding_box.map(bounding_coordinates),
        polygons: polygons
            .iter()
            .map(|polygon| GPolygon {
                outer_ring: polygon
                    .points
                    .iter()
                    .map(|[latitude, longitude]| GRingPoint {
                        latitude: *latitude,
                        longitude: *longitude,
                    })
                    .collect(),
            })
            .collect(),
    }
}
