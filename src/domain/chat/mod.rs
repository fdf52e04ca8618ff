pub mod dto;
pub mod request_validator;
pub mod service;
