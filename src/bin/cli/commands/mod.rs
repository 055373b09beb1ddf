pub mod chunk;
pub mod review;
