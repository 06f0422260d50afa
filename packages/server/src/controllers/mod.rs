pub mod media;
pub mod profile;
pub mod session;
