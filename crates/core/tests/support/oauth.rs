//! Scriptable OAuth client and factory

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use authsync_core::ports::{OAuthClientAdapter, OAuthClientFactory};
use authsync_domain::{
    AuthError, ClientOptions, LoginOptions, LogoutOptions, Result as DomainResult, UserProfile,
};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use url::Url;

type Hook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ClientState {
    authenticated: bool,
    user: Option<UserProfile>,
    token: Option<String>,
    auth_error: Option<AuthError>,
    callback_error: Option<AuthError>,
    token_error: Option<AuthError>,
    sign_in_on_callback: Option<(UserProfile, String)>,
    calls: Vec<&'static str>,
    callback_urls: Vec<String>,
    logins: Vec<LoginOptions>,
    logouts: Vec<LogoutOptions>,
}

/// In-memory OAuth client whose answers tests control directly.
#[derive(Default)]
pub struct MockOAuthClient {
    state: Mutex<ClientState>,
    check_gate: Mutex<Option<Arc<Semaphore>>>,
    on_get_user: Mutex<Option<Hook>>,
}

impl MockOAuthClient {
    /// Signed out client that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserProfile, token: &str) {
        let mut state = self.state.lock();
        state.authenticated = true;
        state.user = Some(user);
        state.token = Some(token.to_string());
    }

    pub fn sign_out(&self) {
        let mut state = self.state.lock();
        state.authenticated = false;
        state.user = None;
        state.token = None;
    }

    /// A successful callback exchange signs `user` in.
    pub fn sign_in_on_callback(&self, user: UserProfile, token: &str) {
        self.state.lock().sign_in_on_callback = Some((user, token.to_string()));
    }

    pub fn fail_callback(&self, err: AuthError) {
        self.state.lock().callback_error = Some(err);
    }

    pub fn fail_authentication_check(&self, err: AuthError) {
        self.state.lock().auth_error = Some(err);
    }

    pub fn fail_token(&self, err: AuthError) {
        self.state.lock().token_error = Some(err);
    }

    /// Make every later `is_authenticated` wait for a permit on the
    /// returned semaphore before answering.
    pub fn hold_authentication_checks(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.check_gate.lock() = Some(gate.clone());
        gate
    }

    /// Run `hook` at the start of every `get_user` call.
    pub fn on_get_user(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_get_user.lock() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| **call == name).count()
    }

    pub fn callback_urls(&self) -> Vec<String> {
        self.state.lock().callback_urls.clone()
    }

    pub fn logins(&self) -> Vec<LoginOptions> {
        self.state.lock().logins.clone()
    }

    pub fn logouts(&self) -> Vec<LogoutOptions> {
        self.state.lock().logouts.clone()
    }
}

#[async_trait]
impl OAuthClientAdapter for MockOAuthClient {
    async fn handle_redirect_callback(&self, url: &Url) -> DomainResult<()> {
        let mut state = self.state.lock();
        state.calls.push("handle_redirect_callback");
        state.callback_urls.push(url.to_string());

        if let Some(err) = state.callback_error.clone() {
            return Err(err);
        }
        if let Some((user, token)) = state.sign_in_on_callback.take() {
            state.authenticated = true;
            state.user = Some(user);
            state.token = Some(token);
        }
        Ok(())
    }

    async fn is_authenticated(&self) -> DomainResult<bool> {
        self.state.lock().calls.push("is_authenticated");

        let gate = self.check_gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|_| AuthError::client("is_authenticated", "check gate closed"))?
                .forget();
        }

        let state = self.state.lock();
        match state.auth_error.clone() {
            Some(err) => Err(err),
            None => Ok(state.authenticated),
        }
    }

    async fn get_user(&self) -> DomainResult<Option<UserProfile>> {
        if let Some(hook) = self.on_get_user.lock().as_ref() {
            hook();
        }

        let mut state = self.state.lock();
        state.calls.push("get_user");
        Ok(state.user.clone())
    }

    async fn get_token_silently(&self) -> DomainResult<String> {
        let mut state = self.state.lock();
        state.calls.push("get_token_silently");
        if let Some(err) = state.token_error.clone() {
            return Err(err);
        }
        state
            .token
            .clone()
            .ok_or_else(|| AuthError::client("get_token_silently", "login_required"))
    }

    async fn login_with_redirect(&self, options: &LoginOptions) -> DomainResult<()> {
        let mut state = self.state.lock();
        state.calls.push("login_with_redirect");
        state.logins.push(options.clone());
        Ok(())
    }

    async fn logout(&self, options: &LogoutOptions) -> DomainResult<()> {
        let mut state = self.state.lock();
        state.calls.push("logout");
        state.logouts.push(options.clone());
        state.authenticated = false;
        state.user = None;
        state.token = None;
        Ok(())
    }
}

/// Hands out one shared [`MockOAuthClient`] and records what it was asked
/// to build.
pub struct MockClientFactory {
    client: Arc<MockOAuthClient>,
    created: AtomicUsize,
    options: Mutex<Vec<ClientOptions>>,
    error: Mutex<Option<AuthError>>,
}

impl MockClientFactory {
    pub fn new(client: Arc<MockOAuthClient>) -> Self {
        Self {
            client,
            created: AtomicUsize::new(0),
            options: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    /// Fail construction with `err` until cleared with `None`.
    pub fn set_error(&self, err: Option<AuthError>) {
        *self.error.lock() = err;
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<ClientOptions> {
        self.options.lock().last().cloned()
    }
}

#[async_trait]
impl OAuthClientFactory for MockClientFactory {
    async fn create_client(
        &self,
        options: &ClientOptions,
    ) -> DomainResult<Arc<dyn OAuthClientAdapter>> {
        self.options.lock().push(options.clone());
        if let Some(err) = self.error.lock().clone() {
            return Err(err);
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        let client: Arc<dyn OAuthClientAdapter> = self.client.clone();
        Ok(client)
    }
}
