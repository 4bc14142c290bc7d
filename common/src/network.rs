pub mod address;
pub mod endpoint;
pub mod resolve;
