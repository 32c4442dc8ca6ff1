pub mod optimize;
pub mod sample;
