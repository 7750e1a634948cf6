//! Client side of reelgate: an HTTP client for the API, token persistence,
//! and the session controller that ties them together.

pub mod api;
pub mod error;
pub mod session;
pub mod store;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::{Notice, Session, SessionController};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
