pub mod rolling_buffer;
pub mod shared;
