use std::fmt;

use const_format::concatcp;

pub mod database;
mod data_manager;
mod gpx_util;

pub use data_manager::*;
pub use gpx_util::read_gpx;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "tracks.db");

#[derive(Debug)]
pub enum DataManagerError {
    Database(String),
    GpxImport(String),
    GpxExport(String),
}

impl fmt::Display for DataManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataManagerError::Database(message) => write!(f, "database error: {message}"),
            DataManagerError::GpxImport(message) => write!(f, "GPX import failed: {message}"),
            DataManagerError::GpxExport(message) => write!(f, "GPX export failed: {message}"),
        }
    }
}

impl std::error::Error for DataManagerError {}
