//! The viewer's two views and the router choosing between them
//!
//! Views are headless state machines; drawing lives in [`crate::ui`].

pub mod raster;
pub mod router;
pub mod vector;

pub use raster::RasterMapView;
pub use router::{Route, Router};
pub use vector::{FetchState, VectorMapView, ViewState};
