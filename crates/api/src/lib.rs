#![forbid(unsafe_code)]

pub mod http;
pub mod memory;
pub mod ports;
pub mod redirect;

pub use http::{ApiConfig, ApiConfigError, HttpApi};
pub use memory::InMemoryApi;
pub use ports::{
    Api, ApiError, AuthStatus, Authenticator, CardProvider, Credentials, DeckDirectory,
    ReviewReceipt, ReviewSink,
};
pub use redirect::{login_next, login_redirect, sanitize_next, study_path};
