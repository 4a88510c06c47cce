pub mod checkpoint;
pub mod data;
pub mod dataset;
pub mod error;
pub mod io;
pub mod summary;
pub mod train;
