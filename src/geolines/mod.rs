//! Geographic line overlays for the globe.
//!
//! [`source`] fetches raw coastline/river/lake/graticule data, [`cache`]
//! keeps it for the life of the process, [`processor`] projects it onto the
//! sphere as colored segments, and [`geometry`] packs those segments into
//! buffers a renderer can draw.

pub mod cache;
pub mod geojson;
pub mod geometry;
pub mod processor;
pub mod projection;
pub mod source;

pub use cache::{cache_key, GeoLineCache};
pub use geometry::{build_geometry, GeometryOptions, LineGeometry, LineMaterial};
pub use processor::{
    default_color, process_geojson, process_parallel_arrays, segments_from, LineInput,
    LineSegment,
};
pub use projection::{project_point, Point3};
pub use source::{
    asset_path, AssetFetcher, FeatureType, FsAssetFetcher, GeoLineData, GeoLineSource,
    Resolution,
};
