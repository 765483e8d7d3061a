mod clock;
mod interface;
mod memory;

pub use clock::*;
pub use interface::*;
pub use memory::*;
