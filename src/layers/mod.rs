pub mod base;
pub mod control;
pub mod macros;
pub mod manager;
pub mod tile;
pub mod vector_tile;
