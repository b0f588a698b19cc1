pub(crate) mod quantity;
pub(crate) mod vector;

pub use quantity::Quantity;
pub use vector::{ResourceVector, dominant_ratio};

pub const CPU_RESOURCE_NAME: &str = "cpu";
pub const MEM_RESOURCE_NAME: &str = "memory";
