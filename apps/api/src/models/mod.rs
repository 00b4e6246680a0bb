pub mod review;
pub mod suggestion;
