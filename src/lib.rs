//! reachmap core
//!
//! Resolves travel-time reachability polygons (isochrones) for a set of
//! named locations, computes the areas where two or more of them overlap,
//! and matches a static set of points of interest against those overlaps.
//! Map rendering and other presentation concerns live with the caller.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod geoapify;
pub mod geocode;
pub mod geometry;
pub mod manager;
pub mod mapbox;
pub mod overlap;
pub mod poi;
pub mod traits;
