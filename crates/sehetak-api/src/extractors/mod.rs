//! Custom request extractors.

pub mod path;
pub mod requester;

pub use path::ApiPath;
pub use requester::Requester;
