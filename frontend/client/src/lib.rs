pub mod http;

pub use http::HttpCardService;
