pub mod format;
pub mod response;
pub mod upload;
