#[allow(clippy::module_inception)]
mod allocator;
mod status;

pub use allocator::*;
pub use status::*;
