pub mod chat_request;
pub mod upstream_completion;
