//! Sign-in and sign-up flows on top of [`AuthGateway`].
//! Everything here forwards to the backend; the only local checks are the sign-up form rules.

use crate::models::session::Session;
use crate::supabase::{AuthGateway, OAuthProvider};
use leptos::logging::{log, warn};
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Post-login destination from a `redirect` query value.
/// Only same-site paths are honoured; anything else lands on the root.
/// Browsers drop tabs and newlines while parsing, so control characters are refused outright.
pub fn redirect_target(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(path) if is_same_site_path(path) => path.to_string(),
        Some(other) if !other.is_empty() => {
            warn!("[AUTH] Ignoring off-site redirect target {}", other);
            "/".to_string()
        }
        _ => "/".to_string(),
    }
}

fn is_same_site_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.chars().any(|c| c.is_ascii_control())
        && !path.starts_with("//")
        && !path.contains('\\')
}

pub fn login_path(target: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(target))
}

pub fn signup_path(target: &str) -> String {
    format!("/signup?redirect={}", urlencoding::encode(target))
}

/// Where the OAuth provider should send the browser back to.
pub fn callback_url(origin: &str, target: &str) -> String {
    format!(
        "{}/auth/callback?redirect={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(target)
    )
}

/// Query parameters the provider appends to the callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub redirect: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Location the callback route redirects to.
pub fn callback_redirect(params: &CallbackParams) -> String {
    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        warn!(
            "[AUTH] OAuth error: {} {}",
            error,
            params.error_description.as_deref().unwrap_or_default()
        );
        return format!("/login?error={}", urlencoding::encode(error));
    }
    let target = redirect_target(params.redirect.as_deref());
    match params.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => with_query_param(&target, "code", code),
        None => target,
    }
}

// Splits `route?query#fragment`, dropping every `key` pair from the query.
fn split_without<'a>(path: &'a str, key: &str) -> (&'a str, Vec<&'a str>, Option<&'a str>) {
    let (base, fragment) = match path.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (path, None),
    };
    let (route, query) = base.split_once('?').unwrap_or((base, ""));
    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(key))
        .collect();
    (route, pairs, fragment)
}

fn join_path(route: &str, pairs: &[String], fragment: Option<&str>) -> String {
    let mut out = route.to_string();
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Appends or replaces one query parameter on a site path, keeping any fragment at the end.
pub fn with_query_param(path: &str, key: &str, value: &str) -> String {
    let (route, pairs, fragment) = split_without(path, key);
    let mut pairs: Vec<String> = pairs.into_iter().map(str::to_string).collect();
    pairs.push(format!("{}={}", key, urlencoding::encode(value)));
    join_path(route, &pairs, fragment)
}

pub fn without_query_param(path: &str, key: &str) -> String {
    let (route, pairs, fragment) = split_without(path, key);
    let pairs: Vec<String> = pairs.into_iter().map(str::to_string).collect();
    join_path(route, &pairs, fragment)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpProblem {
    InvalidEmail,
    PasswordTooShort,
    PasswordMismatch,
}

impl fmt::Display for SignUpProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignUpProblem::InvalidEmail => write!(f, "Enter a valid email address"),
            SignUpProblem::PasswordTooShort => {
                write!(f, "Password must be at least {} characters", MIN_PASSWORD_LEN)
            }
            SignUpProblem::PasswordMismatch => write!(f, "Passwords do not match"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), SignUpProblem> {
        if !self.email.contains('@') {
            return Err(SignUpProblem::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignUpProblem::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(SignUpProblem::PasswordMismatch);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but the e-mail must be confirmed first.
    ConfirmationPending,
}

/// Password sign-in. The error is the text to show under the form.
pub async fn sign_in<G: AuthGateway>(gateway: &G, email: &str, password: &str) -> Result<Session, String> {
    gateway
        .sign_in_with_password(email.trim(), password)
        .await
        .map_err(|e| e.user_message("Failed to sign in"))
}

/// Validates locally, then creates the account. Invalid forms never reach the gateway.
pub async fn sign_up<G: AuthGateway>(gateway: &G, form: &SignUpForm) -> Result<SignUpOutcome, String> {
    form.validate().map_err(|p| p.to_string())?;
    match gateway
        .sign_up(form.email.trim(), &form.password, serde_json::json!({}))
        .await
    {
        Ok(Some(session)) => Ok(SignUpOutcome::SignedIn(session)),
        Ok(None) => Ok(SignUpOutcome::ConfirmationPending),
        Err(e) => Err(e.user_message("Failed to create account")),
    }
}

/// URL that starts an OAuth sign-in returning to `target` on this site.
pub fn start_oauth<G: AuthGateway>(gateway: &G, provider: OAuthProvider, origin: &str, target: &str) -> String {
    gateway.oauth_authorize_url(provider, &callback_url(origin, target))
}

pub fn oauth_failure_message(provider: OAuthProvider, verb: &str) -> String {
    format!("Failed to {} with {}", verb, provider.as_str())
}

/// Finishes an OAuth return. Failures are logged and dropped: the usual cause is the
/// same page effect running twice with one code, and the first run already signed in.
pub async fn complete_code_exchange<G: AuthGateway>(gateway: &G, code: &str) -> Option<Session> {
    match gateway.exchange_code_for_session(code).await {
        Ok(session) => {
            log!("[AUTH] Session established from authorization code");
            Some(session)
        }
        Err(e) => {
            warn!("[AUTH] Ignoring code exchange failure: {}", e);
            gateway.get_session()
        }
    }
}
