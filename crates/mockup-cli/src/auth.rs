//! Browser-delegated sign-in over a loopback callback.
//!
//! The client binds an ephemeral port on `127.0.0.1`, opens the server's
//! sign-in page in a browser and waits for the browser to be redirected back
//! to `/callback?token=...&name=...`. The token travels through a single-use
//! channel; a cancellation token shuts the listener down on every exit path.

use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use mockup_core::api::DISPLAY_NAME_PARAM;
use mockup_core::api::TOKEN_PARAM;
use mockup_core::api::cli_login_url;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::credentials::CredentialStore;
use crate::credentials::StoredCredential;
use crate::error::ClientError;

/// Identity provider used when none is given.
pub const DEFAULT_PROVIDER: &str = "github";

/// How long the handshake waits for the browser.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Path of the loopback callback route.
pub const CALLBACK_PATH: &str = "/callback";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const CONFIRMATION_PAGE: &str = "<!DOCTYPE html>
<html>
<head><meta charset=\"utf-8\"><title>Signed in</title></head>
<body style=\"font-family: sans-serif; text-align: center; padding-top: 4em\">
<h1>You are signed in</h1>
<p>You can close this window and return to the terminal.</p>
</body>
</html>
";

/// Parameters of one sign-in.
#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Server whose sign-in page is opened and whose token is stored.
    pub server: String,
    /// Identity provider segment of the sign-in URL.
    pub provider: String,
    /// Deadline for the browser callback.
    pub timeout: Duration,
}

impl LoginOptions {
    /// Creates options for `server` with the default provider and timeout.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            provider: DEFAULT_PROVIDER.to_string(),
            timeout: LOGIN_TIMEOUT,
        }
    }

    /// Sets the identity provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Sets the callback deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a completed sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Server the token was stored for.
    pub server: String,
    /// Display name reported by the callback, if any.
    pub display_name: Option<String>,
}

impl LoginOutcome {
    /// Confirmation line for the user.
    pub fn message(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Logged in as {name}"),
            None => "Logged in successfully".to_string(),
        }
    }
}

/// Opens URLs in the user's browser.
pub trait BrowserOpener {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no browser could be launched.
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Launches the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        open::that(url)
    }
}

#[derive(Debug)]
struct Callback {
    token: String,
    name: Option<String>,
}

/// Single-use slot the callback handler publishes into.
struct CallbackSlot {
    sender: Mutex<Option<oneshot::Sender<Callback>>>,
}

impl CallbackSlot {
    fn new(sender: oneshot::Sender<Callback>) -> Self {
        Self {
            sender: Mutex::new(Some(sender)),
        }
    }

    fn publish(&self, callback: Callback) {
        let sender = self.sender.lock().ok().and_then(|mut slot| slot.take());
        match sender {
            Some(sender) => {
                if sender.send(callback).is_err() {
                    debug!("callback arrived after the handshake ended");
                }
            }
            None => debug!("duplicate callback ignored"),
        }
    }
}

fn callback_router(slot: Arc<CallbackSlot>) -> Router {
    Router::new()
        .route(CALLBACK_PATH, get(handle_callback))
        .with_state(slot)
}

async fn handle_callback(
    State(slot): State<Arc<CallbackSlot>>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Response {
    let Some(token) = params.remove(TOKEN_PARAM).filter(|token| !token.is_empty()) else {
        debug!("callback without token rejected");
        return (StatusCode::BAD_REQUEST, "missing token").into_response();
    };
    let name = params
        .remove(DISPLAY_NAME_PARAM)
        .filter(|name| !name.is_empty());

    slot.publish(Callback { token, name });
    Html(CONFIRMATION_PAGE).into_response()
}

/// Loopback sign-in client.
pub struct LoopbackAuthClient<B = SystemBrowser> {
    store: CredentialStore,
    browser: B,
}

impl<B: BrowserOpener> LoopbackAuthClient<B> {
    /// Creates a client with a custom browser launcher.
    pub const fn with_browser(store: CredentialStore, browser: B) -> Self {
        Self { store, browser }
    }

    /// Runs one sign-in handshake and stores the received token.
    ///
    /// Callbacks without a token are answered with `400` and the wait
    /// continues. The listener is closed before this returns, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if no token arrives before the
    /// deadline, [`ClientError::Listener`] if the listener fails, and
    /// [`ClientError::Credentials`] if the token cannot be stored.
    pub async fn login(&self, options: &LoginOptions) -> Result<LoginOutcome, ClientError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .map_err(|e| ClientError::Listener(e.to_string()))?;
        let port = listener
            .local_addr()
            .map_err(|e| ClientError::Listener(e.to_string()))?
            .port();
        debug!(port, "loopback listener bound");

        let (sender, receiver) = oneshot::channel();
        let app = callback_router(Arc::new(CallbackSlot::new(sender)));

        let shutdown = CancellationToken::new();
        // cancels the listener if this future is dropped mid-wait
        let _guard = shutdown.clone().drop_guard();
        let signal = shutdown.clone();
        let mut server: JoinHandle<io::Result<()>> = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        let url = cli_login_url(&options.server, &options.provider, port);
        if let Err(e) = self.browser.open(&url) {
            debug!(error = %e, "cannot open browser");
        }
        info!(%url, "waiting for browser sign-in");

        let mut server_done = false;
        let received = tokio::select! {
            callback = receiver => callback
                .map_err(|_| ClientError::Listener("callback channel closed".to_string())),
            finished = &mut server => {
                server_done = true;
                Err(listener_fault(finished))
            }
            () = tokio::time::sleep(options.timeout) => Err(ClientError::Timeout),
        };

        shutdown.cancel();
        if !server_done {
            stop_server(server).await;
        }
        debug!(port, "loopback listener closed");

        let callback = received?;
        self.store.save(&StoredCredential {
            server: options.server.clone(),
            token: callback.token,
        })?;

        Ok(LoginOutcome {
            server: options.server.clone(),
            display_name: callback.name,
        })
    }
}

fn listener_fault(finished: Result<io::Result<()>, tokio::task::JoinError>) -> ClientError {
    match finished {
        Ok(Ok(())) => ClientError::Listener("listener stopped unexpectedly".to_string()),
        Ok(Err(e)) => ClientError::Listener(e.to_string()),
        Err(e) => ClientError::Listener(e.to_string()),
    }
}

async fn stop_server(mut server: JoinHandle<io::Result<()>>) {
    if tokio::time::timeout(SHUTDOWN_GRACE, &mut server)
        .await
        .is_err()
    {
        warn!("listener did not drain in time, aborting");
        server.abort();
        let _ = server.await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    const SERVER: &str = "https://review.example.com";

    /// Hands the sign-in URL to the test instead of a browser.
    struct RecordingBrowser(mpsc::UnboundedSender<String>);

    impl BrowserOpener for RecordingBrowser {
        fn open(&self, url: &str) -> io::Result<()> {
            let _ = self.0.send(url.to_string());
            Ok(())
        }
    }

    struct FailingBrowser;

    impl BrowserOpener for FailingBrowser {
        fn open(&self, _url: &str) -> io::Result<()> {
            Err(io::Error::other("no browser"))
        }
    }

    fn port_of(url: &str) -> u16 {
        url.rsplit_once("port=").unwrap().1.parse().unwrap()
    }

    fn recording_client(
        temp: &TempDir,
    ) -> (
        LoopbackAuthClient<RecordingBrowser>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = CredentialStore::new(temp.path().join("credentials.json"));
        (
            LoopbackAuthClient::with_browser(store, RecordingBrowser(tx)),
            rx,
        )
    }

    #[tokio::test]
    async fn test_tokenless_callback_keeps_waiting() {
        let temp = TempDir::new().unwrap();
        let (client, mut urls) = recording_client(&temp);
        let options = LoginOptions::new(SERVER).with_timeout(Duration::from_secs(10));

        let browser = async {
            let url = urls.recv().await.unwrap();
            assert!(url.starts_with("https://review.example.com/auth/github/cli-login?port="));
            let base = format!("http://127.0.0.1:{}{CALLBACK_PATH}", port_of(&url));
            let http = reqwest::Client::new();

            let rejected = http.get(&base).send().await.unwrap();
            assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);

            let empty = http.get(format!("{base}?token=")).send().await.unwrap();
            assert_eq!(empty.status(), reqwest::StatusCode::BAD_REQUEST);

            let accepted = http
                .get(format!("{base}?token=tok&name=User"))
                .send()
                .await
                .unwrap();
            assert_eq!(accepted.status(), reqwest::StatusCode::OK);
            assert!(accepted.text().await.unwrap().contains("signed in"));
        };

        let (outcome, ()) = tokio::join!(client.login(&options), browser);
        let outcome = outcome.unwrap();
        assert_eq!(outcome.display_name.as_deref(), Some("User"));
        assert_eq!(outcome.message(), "Logged in as User");

        let stored = client.store.load().unwrap();
        assert_eq!(
            stored,
            StoredCredential {
                server: SERVER.to_string(),
                token: "tok".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_callback_without_name() {
        let temp = TempDir::new().unwrap();
        let (client, mut urls) = recording_client(&temp);
        let options = LoginOptions::new(SERVER)
            .with_provider("gitlab")
            .with_timeout(Duration::from_secs(10));

        let browser = async {
            let url = urls.recv().await.unwrap();
            assert!(url.contains("/auth/gitlab/cli-login"));
            reqwest::get(format!(
                "http://127.0.0.1:{}{CALLBACK_PATH}?token=abc",
                port_of(&url)
            ))
            .await
            .unwrap();
        };

        let (outcome, ()) = tokio::join!(client.login(&options), browser);
        let outcome = outcome.unwrap();
        assert_eq!(outcome.display_name, None);
        assert_eq!(outcome.message(), "Logged in successfully");
        assert_eq!(client.store.load().unwrap().token, "abc");
    }

    #[tokio::test]
    async fn test_timeout_stores_nothing_and_closes_port() {
        let temp = TempDir::new().unwrap();
        let (client, mut urls) = recording_client(&temp);
        let options = LoginOptions::new(SERVER).with_timeout(Duration::from_millis(200));

        let err = client.login(&options).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
        assert!(!client.store.load().unwrap().is_logged_in());

        let port = port_of(&urls.recv().await.unwrap());
        assert!(
            tokio::net::TcpStream::connect((Ipv4Addr::LOCALHOST, port))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_browser_failure_is_ignored() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::new(temp.path().join("credentials.json"));
        let client = LoopbackAuthClient::with_browser(store, FailingBrowser);
        let options = LoginOptions::new(SERVER).with_timeout(Duration::from_millis(100));

        let err = client.login(&options).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
    }

    #[tokio::test]
    async fn test_login_keeps_existing_record_on_timeout() {
        let temp = TempDir::new().unwrap();
        let (client, _urls) = recording_client(&temp);
        let previous = StoredCredential {
            server: "https://old.example.com".into(),
            token: "old".into(),
        };
        client.store.save(&previous).unwrap();

        let options = LoginOptions::new(SERVER).with_timeout(Duration::from_millis(100));
        assert!(client.login(&options).await.is_err());
        assert_eq!(client.store.load().unwrap(), previous);
    }

    #[test]
    fn test_default_options() {
        let options = LoginOptions::new(SERVER);
        assert_eq!(options.provider, DEFAULT_PROVIDER);
        assert_eq!(options.timeout, LOGIN_TIMEOUT);
    }
}
