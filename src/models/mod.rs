pub mod consultation;
pub mod enums;
pub mod medication;
pub mod patient;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

pub use consultation::*;
pub use enums::*;
pub use medication::*;
pub use patient::*;
pub use summary::*;
