use bytes::Bytes;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::store::TokenStore;

/// Whether the user currently holds a token.
#[derive(Clone, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn { token: String },
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::LoggedOut => f.write_str("LoggedOut"),
            Session::LoggedIn { .. } => f
                .debug_struct("LoggedIn")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// The last status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Drives the logged-in / logged-out state from the presence of a token.
///
/// The token lives in [`Session`] and in the [`TokenStore`]; the two are
/// always updated together. Any request the server rejects with 401/403
/// ends the session, as does any failure to list videos.
pub struct SessionController<S> {
    api: ApiClient,
    store: S,
    session: Session,
    notice: Option<Notice>,
}

impl<S: TokenStore> SessionController<S> {
    /// Restore a persisted token if there is one.
    pub fn new(api: ApiClient, store: S) -> Result<Self, ClientError> {
        let session = match store.load()? {
            Some(token) => Session::LoggedIn { token },
            None => Session::LoggedOut,
        };

        Ok(Self {
            api,
            store,
            session,
            notice: None,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.session, Session::LoggedIn { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match &self.session {
            Session::LoggedIn { token } => Some(token),
            Session::LoggedOut => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        match self.api.register(username, password).await {
            Ok(message) => {
                self.notice = Some(Notice::info(format!("{} Please log in.", message)));
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::error(format!("Request failed: {}", e)));
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let token = match self.api.login(username, password).await {
            Ok(token) => token,
            Err(e) => {
                self.notice = Some(Notice::error(format!("Request failed: {}", e)));
                return Err(e);
            }
        };

        self.store.save(&token)?;
        self.session = Session::LoggedIn { token };
        self.notice = Some(Notice::info("Login successful."));
        info!("Logged in as {}", username);
        Ok(())
    }

    /// Fetch the video list. Any failure ends the session.
    pub async fn videos(&mut self) -> Result<Vec<String>, ClientError> {
        let token = self.token().ok_or(ClientError::NotLoggedIn)?.to_string();

        match self.api.list_videos(&token).await {
            Ok(videos) => Ok(videos),
            Err(e) => {
                warn!("Video listing failed, ending session: {}", e);
                self.notice = Some(Notice::error("Failed to fetch videos. Please log in again."));
                self.end_session_after(&e);
                Err(e)
            }
        }
    }

    /// Download a whole video. Only auth failures end the session.
    pub async fn play(&mut self, filename: &str) -> Result<Bytes, ClientError> {
        let token = self.token().ok_or(ClientError::NotLoggedIn)?.to_string();

        match self.api.fetch_video(&token, filename).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                self.notice = Some(Notice::error(format!("Error playing video: {}", e)));
                if e.is_auth_failure() {
                    self.end_session_after(&e);
                }
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.end_session()?;
        self.notice = Some(Notice::info("Logged out successfully."));
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), ClientError> {
        self.session = Session::LoggedOut;
        self.store.clear()
    }

    /// End the session because a request failed with `cause`. The caller
    /// reports `cause`; a store failure here is only logged.
    fn end_session_after(&mut self, cause: &ClientError) {
        if let Err(e) = self.end_session() {
            warn!("Could not clear stored token after {}: {}", cause, e);
        }
    }
}
