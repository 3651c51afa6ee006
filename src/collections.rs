pub mod list_map;

pub use list_map::ListMap;

use crate::alloc::AllocError;
use std::{error::Error, fmt};

/// The error type for fallible [`ListMap`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A node could not be allocated. The map is unchanged.
    OutOfMemory,

    /// The key to be removed is not in the map.
    ItemDoesNotExist,

    /// The cursor was advanced without a traversal in progress, either
    /// because none was started, another operation cancelled it, or it had
    /// already passed the last key.
    InvalidState,
}

impl From<AllocError> for MapError {
    fn from(_: AllocError) -> Self {
        MapError::OutOfMemory
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapError::OutOfMemory => "out of memory",
            MapError::ItemDoesNotExist => "item does not exist",
            MapError::InvalidState => "no traversal in progress",
        })
    }
}

impl Error for MapError {}
