pub mod application;
pub mod catalog;
