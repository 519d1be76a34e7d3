pub mod handlers;
pub mod store;
pub mod upload;
pub mod validation;
