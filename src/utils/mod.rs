pub mod coordinate;
#[cfg(feature = "camera")]
pub mod image;
