pub mod json;
pub mod session;
pub mod upload;
