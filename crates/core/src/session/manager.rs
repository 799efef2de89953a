//! Session state manager - core business logic
//!
//! Owns the single observable session record of a browser tab and sequences
//! the OAuth client through initialization, redirect handling, refreshes,
//! login and logout. Nothing here returns an error to its caller: failures
//! are logged, kept in the diagnostic log, and the session degrades to
//! signed out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use authsync_common::{ErrorClassification, ErrorSeverity};
use authsync_domain::constants::CALLBACK_CLEAN_PATH;
use authsync_domain::{
    AuthConfig, AuthError, ClientOptions, Diagnostic, LoginOptions, LogoutOptions, Result,
    SessionPhase, SessionPolicy, SessionSnapshot, UserProfile,
};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, error, info, warn};

use super::diagnostics::DiagnosticLog;
use crate::callback::RedirectOutcome;
use crate::ports::{
    BrowserContext, EnvironmentAccessor, OAuthClientAdapter, OAuthClientFactory,
    RuntimeContextGuard,
};
use crate::sync::StorageListener;

/// The OAuth client, once configuration has been resolved
enum ClientSlot {
    Uninitialized,
    Ready { client: Arc<dyn OAuthClientAdapter>, config: AuthConfig },
}

/// Per-tab OAuth session state machine
///
/// Construct once per page, wrap in an [`Arc`], and call
/// [`initialize`](Self::initialize) before anything else. UI code reads the
/// snapshot getters or subscribes to change notifications.
pub struct SessionStateManager {
    environment: Arc<dyn EnvironmentAccessor>,
    browser: Arc<dyn BrowserContext>,
    runtime: Arc<dyn RuntimeContextGuard>,
    factory: Arc<dyn OAuthClientFactory>,
    policy: SessionPolicy,
    client: RwLock<ClientSlot>,
    init_started: AtomicBool,
    state: watch::Sender<SessionSnapshot>,
    refresh_gate: AsyncMutex<()>,
    diagnostics: Mutex<DiagnosticLog>,
    listener: Mutex<Option<StorageListener>>,
}

impl SessionStateManager {
    /// Create a manager with an empty session and the default policy.
    pub fn new(
        environment: Arc<dyn EnvironmentAccessor>,
        browser: Arc<dyn BrowserContext>,
        runtime: Arc<dyn RuntimeContextGuard>,
        factory: Arc<dyn OAuthClientFactory>,
    ) -> Self {
        let policy = SessionPolicy::default();
        let (state, _) = watch::channel(SessionSnapshot::default());

        Self {
            environment,
            browser,
            runtime,
            factory,
            policy,
            client: RwLock::new(ClientSlot::Uninitialized),
            init_started: AtomicBool::new(false),
            state,
            refresh_gate: AsyncMutex::new(()),
            diagnostics: Mutex::new(DiagnosticLog::new(policy.diagnostics_capacity)),
            listener: Mutex::new(None),
        }
    }

    /// Replace the default [`SessionPolicy`].
    #[must_use]
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self.diagnostics = Mutex::new(DiagnosticLog::new(policy.diagnostics_capacity));
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Bring the session up for this page load.
    ///
    /// Does nothing outside a browser. Otherwise constructs the OAuth
    /// client, processes a pending redirect return, refreshes the session
    /// and starts listening for storage changes made by other tabs.
    ///
    /// A second call after a successful one is ignored. A call that failed
    /// to construct the client leaves the session untouched and may be
    /// retried.
    pub async fn initialize(self: &Arc<Self>) {
        if self.runtime.is_server_render() {
            debug!("server render detected, skipping session initialization");
            return;
        }

        if self.init_started.swap(true, Ordering::AcqRel) {
            warn!("session manager already initialized, ignoring");
            return;
        }

        let config = match self.construct_client().await {
            Ok(config) => config,
            Err(err) => {
                self.record("initialize", err);
                self.init_started.store(false, Ordering::Release);
                return;
            }
        };
        info!(domain = %config.domain, "OAuth client constructed");

        self.enter_phase(SessionPhase::CheckingCallback);
        self.handle_redirect().await;
        self.update_state().await;
        self.listen_for_storage_changes();
    }

    /// Re-derive the authentication flag, profile and token from the client.
    ///
    /// Safe to call redundantly. With `single_flight_refresh` overlapping
    /// calls run one after another.
    pub async fn update_state(&self) {
        let _gate = if self.policy.single_flight_refresh {
            Some(self.refresh_gate.lock().await)
        } else {
            None
        };

        self.enter_phase(SessionPhase::Refreshing);
        let authenticated = self.refresh_authentication_flag().await;
        self.enter_phase(if authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        });
    }

    /// Ask the client whether a session exists and store the answer.
    ///
    /// Resolves `false` without a client or when the check fails. A `true`
    /// answer is published together with the freshly fetched profile and
    /// token, never ahead of them.
    pub async fn refresh_authentication_flag(&self) -> bool {
        let Some(client) = self.client() else {
            self.store_signed_out();
            return false;
        };

        let authenticated = match client.is_authenticated().await {
            Ok(authenticated) => authenticated,
            Err(err) => {
                self.record("is_authenticated", err);
                false
            }
        };
        if !authenticated {
            self.store_signed_out();
            return false;
        }

        let (user, token) = self.fetch_user_and_token(client.as_ref()).await;
        let has_user = user.is_some();
        let has_token = token.is_some();
        self.state.send_if_modified(|snapshot| {
            replace_if_changed(&mut snapshot.is_authenticated, Some(true))
                | replace_if_changed(&mut snapshot.current_user, user)
                | replace_if_changed(&mut snapshot.token, token)
        });
        debug!(authenticated, has_user, has_token, "authentication flag refreshed");

        true
    }

    /// Fetch the profile and a fresh access token and store both.
    ///
    /// A failed token retrieval leaves the token unset.
    pub async fn refresh_user_and_token(&self) -> Option<UserProfile> {
        let Some(client) = self.client() else {
            self.state.send_if_modified(|snapshot| {
                replace_if_changed(&mut snapshot.current_user, None)
                    | replace_if_changed(&mut snapshot.token, None)
            });
            return None;
        };

        let (user, token) = self.fetch_user_and_token(client.as_ref()).await;
        let has_token = token.is_some();
        self.state.send_if_modified(|snapshot| {
            replace_if_changed(&mut snapshot.current_user, user.clone())
                | replace_if_changed(&mut snapshot.token, token)
        });
        debug!(has_user = user.is_some(), has_token, "user and token refreshed");

        user
    }

    /// Start a redirect login that returns to the current origin.
    ///
    /// On success the page navigates away. If control comes back the
    /// session is refreshed.
    pub async fn login(&self) {
        let Some((client, config)) = self.ready() else {
            self.record("login", AuthError::ClientUnavailable("login before initialization".into()));
            return;
        };

        let options = LoginOptions::for_origin(&config, self.browser.origin());
        info!(
            redirect_uri = %options.authorization_params.redirect_uri,
            scope = %options.authorization_params.scope,
            "starting redirect login"
        );
        if let Err(err) = client.login_with_redirect(&options).await {
            self.record("login", err);
        }

        self.update_state().await;
    }

    /// Log out at the provider and return to the current origin.
    pub async fn logout(&self) {
        let Some(client) = self.client() else {
            self.record("logout", AuthError::ClientUnavailable("logout before initialization".into()));
            return;
        };

        let options = self.logout_options();
        info!(return_to = %options.logout_params.return_to, "starting logout");
        if let Err(err) = client.logout(&options).await {
            self.record("logout", err);
        }

        self.update_state().await;
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    /// Authentication flag, degrading to `false` before the first check.
    #[must_use]
    pub fn get_is_authenticated(&self) -> bool {
        self.state.borrow().is_signed_in()
    }

    /// Profile of the signed in user, if any.
    #[must_use]
    pub fn get_user(&self) -> Option<UserProfile> {
        self.current_user()
    }

    /// `None` until the first authentication check completes.
    #[must_use]
    pub fn is_authenticated(&self) -> Option<bool> {
        self.state.borrow().is_authenticated
    }

    /// Last fetched user profile.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().current_user.clone()
    }

    /// Last silently acquired access token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Current step of the session lifecycle.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// Copy of the whole session record.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified whenever the authentication flag, profile or token
    /// changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// `true` once the OAuth client has been constructed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(*self.client.read(), ClientSlot::Ready { .. })
    }

    /// `true` while the cross-tab storage listener is running.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.lock().as_ref().is_some_and(|listener| !listener.is_finished())
    }

    /// Policy this manager was built with.
    #[must_use]
    pub const fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Retained diagnostics, oldest first.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().to_vec()
    }

    /// Most recent diagnostic, if any.
    #[must_use]
    pub fn last_diagnostic(&self) -> Option<Diagnostic> {
        self.diagnostics.lock().latest().cloned()
    }

    /// Options [`login`](Self::login) would send, `None` before the client
    /// exists.
    #[must_use]
    pub fn login_options(&self) -> Option<LoginOptions> {
        self.ready().map(|(_, config)| LoginOptions::for_origin(&config, self.browser.origin()))
    }

    /// Options [`logout`](Self::logout) sends.
    #[must_use]
    pub fn logout_options(&self) -> LogoutOptions {
        LogoutOptions::for_origin(self.browser.origin())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn construct_client(&self) -> Result<AuthConfig> {
        let config = AuthConfig::from_lookup(|key| self.environment.get_env_var(key))?;
        let client = self.factory.create_client(&ClientOptions::persistent(&config)).await?;

        *self.client.write() = ClientSlot::Ready { client, config: config.clone() };
        Ok(config)
    }

    async fn handle_redirect(&self) {
        let url = self.browser.current_url();

        match RedirectOutcome::from_url(&url) {
            RedirectOutcome::Authorization { state, .. } => {
                debug!(%state, "authorization redirect detected");
                self.enter_phase(SessionPhase::ProcessingCallback);

                if let Some(client) = self.client() {
                    if let Err(err) = client.handle_redirect_callback(&url).await {
                        self.record("handle_redirect_callback", as_callback_error(err));
                    }
                }

                // Cleaned even when the exchange failed so a reload does not
                // replay a spent code.
                if let Err(err) = self.browser.replace_url(CALLBACK_CLEAN_PATH) {
                    self.record("replace_url", err);
                }
                self.enter_phase(SessionPhase::UrlCleaned);
            }
            RedirectOutcome::ProviderError { error, description } => {
                self.enter_phase(SessionPhase::ErrorReported);
                self.record("initialize", AuthError::provider(error, description));
            }
            RedirectOutcome::NoRedirect => debug!("no redirect parameters in URL"),
        }
    }

    async fn fetch_user_and_token(
        &self,
        client: &dyn OAuthClientAdapter,
    ) -> (Option<UserProfile>, Option<String>) {
        let user = match client.get_user().await {
            Ok(user) => user,
            Err(err) => {
                self.record("get_user", err);
                None
            }
        };

        let token = match client.get_token_silently().await {
            Ok(token) => Some(token),
            Err(err) => {
                self.record("get_token_silently", as_token_error(err));
                None
            }
        };

        (user, token)
    }

    /// Publish a signed out answer, wiping profile and token when the
    /// policy asks for it.
    fn store_signed_out(&self) {
        let clear_stale = self.policy.clear_on_signed_out;
        self.state.send_if_modified(|snapshot| {
            let mut changed = replace_if_changed(&mut snapshot.is_authenticated, Some(false));
            if clear_stale {
                changed |= replace_if_changed(&mut snapshot.current_user, None);
                changed |= replace_if_changed(&mut snapshot.token, None);
            }
            changed
        });
        debug!(authenticated = false, "authentication flag refreshed");
    }

    fn listen_for_storage_changes(self: &Arc<Self>) {
        let events = self.browser.subscribe_storage_changes();
        let manager = Arc::downgrade(self);

        let listener = StorageListener::spawn(events, move || {
            manager.upgrade().map(|manager| async move {
                manager.update_state().await;
            })
        });

        *self.listener.lock() = Some(listener);
        debug!("listening for cross-tab storage changes");
    }

    fn client(&self) -> Option<Arc<dyn OAuthClientAdapter>> {
        match &*self.client.read() {
            ClientSlot::Ready { client, .. } => Some(Arc::clone(client)),
            ClientSlot::Uninitialized => None,
        }
    }

    fn ready(&self) -> Option<(Arc<dyn OAuthClientAdapter>, AuthConfig)> {
        match &*self.client.read() {
            ClientSlot::Ready { client, config } => Some((Arc::clone(client), config.clone())),
            ClientSlot::Uninitialized => None,
        }
    }

    /// Move to `next`; phase moves alone never notify subscribers.
    fn enter_phase(&self, next: SessionPhase) {
        self.state.send_if_modified(|snapshot| {
            if !snapshot.phase.can_transition_to(next) {
                debug!(from = %snapshot.phase, to = %next, "out of order phase transition");
            }
            snapshot.phase = next;
            false
        });
    }

    fn record(&self, operation: &'static str, err: AuthError) {
        let kind = err.label();
        let retryable = err.is_retryable();
        match err.severity() {
            ErrorSeverity::Info => {
                info!(operation, kind, retryable, error = %err, "session operation reported");
            }
            ErrorSeverity::Warning => {
                warn!(operation, kind, retryable, error = %err, "session operation degraded");
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(operation, kind, retryable, error = %err, "session operation failed");
            }
        }

        self.diagnostics.lock().push(Diagnostic::new(operation, err));
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn as_callback_error(err: AuthError) -> AuthError {
    match err {
        AuthError::Callback(_) => err,
        other => AuthError::Callback(other.to_string()),
    }
}

fn as_token_error(err: AuthError) -> AuthError {
    match err {
        AuthError::Token(_) => err,
        other => AuthError::Token(other.to_string()),
    }
}
