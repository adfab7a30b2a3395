pub mod assignment;
pub mod candidate;
