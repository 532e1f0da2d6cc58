pub mod compare;
pub mod sheets;
