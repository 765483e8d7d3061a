mod checksum;
mod identifier;

pub use checksum::*;
pub use identifier::*;
