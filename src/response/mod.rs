//! Response helpers - inline image encoding and public URLs

pub mod data_uri;
pub mod url;

pub use url::UrlHandler;
