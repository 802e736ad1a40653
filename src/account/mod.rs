// Account module - account identifiers and the keys they derive from

mod id;
mod keypair;

pub use id::*;
pub use keypair::*;
