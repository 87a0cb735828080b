pub mod tilejson;

pub use tilejson::{is_vector_source, TileJson};
