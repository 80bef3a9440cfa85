pub mod header;
pub mod mapper;
