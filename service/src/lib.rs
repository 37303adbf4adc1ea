pub mod domain;
pub mod infrastructure;

pub use infrastructure::http::router;
