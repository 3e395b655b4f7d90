//! Repository methods, implemented as `impl VigilDb` blocks per entity.

pub mod change;
pub mod checkpoint;
pub mod snapshot;
