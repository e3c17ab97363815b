pub mod http;
pub mod store;
pub mod time;

pub use http::{HttpClient, HttpResponse};
pub use store::TokenStore;
pub use time::TimeProvider;
