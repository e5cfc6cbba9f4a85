pub mod analysis;
pub mod input;
