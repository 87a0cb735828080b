//! Path based view selection

use crate::{MapError, Result};
use std::fmt;

/// The two views the viewer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    VectorTms,
    RasterTms,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::VectorTms, Route::RasterTms];

    pub fn path(&self) -> &'static str {
        match self {
            Route::VectorTms => "/vector-tms",
            Route::RasterTms => "/raster-tms",
        }
    }

    /// Label for navigation widgets
    pub fn title(&self) -> &'static str {
        match self {
            Route::VectorTms => "Vector TMS",
            Route::RasterTms => "Raster TMS",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Maps paths to routes; there is no shared state between routes
#[derive(Debug, Clone, Copy, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    /// Route for `path`, `None` when nothing matches
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Like [`Router::resolve`] but reports unmatched paths as errors
    pub fn route(&self, path: &str) -> Result<Route> {
        self.resolve(path)
            .ok_or_else(|| MapError::UnknownRoute(path.to_string()))
    }
}
