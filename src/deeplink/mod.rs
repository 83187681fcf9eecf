//! Hand-off from a landing page into the native app.
//!
//! On an eligible platform the page navigates to the app's custom scheme, then races a
//! fallback timer against the page going hidden. Hidden first means the app took over;
//! the timer first means nothing answered and the visitor is sent to the App Store.
//! Both deferred actions share one token, so whichever runs first turns the other into
//! a no-op, and both are released on every exit path including teardown.

pub mod browser;

use crate::config::DeepLinkConfig;
use leptos::logging::log;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// iPhone, iPad or iPod: the native app exists here.
    Ios,
    Other,
}

impl Platform {
    pub fn detect(user_agent: &str) -> Platform {
        let apple_mobile = ["iPhone", "iPad", "iPod"].iter().any(|d| user_agent.contains(d));
        // IE11 on Windows Phone spoofed an iPhone agent and gave itself away with MSStream.
        if apple_mobile && !user_agent.contains("MSStream") {
            Platform::Ios
        } else {
            Platform::Other
        }
    }

    pub fn has_native_app(self) -> bool {
        self == Platform::Ios
    }
}

/// Candidate URLs for one page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkTargets {
    pub universal_link: String,
    pub custom_scheme: String,
    pub app_store: String,
}

impl DeepLinkTargets {
    pub fn for_path(config: &DeepLinkConfig, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        DeepLinkTargets {
            universal_link: format!("https://{}{}", config.app_domain, path),
            custom_scheme: format!("{}:/{}", config.app_scheme, path),
            app_store: config.app_store_url.clone(),
        }
    }

    /// Builds the path from raw segments, percent-encoding each one.
    pub fn for_segments(config: &DeepLinkConfig, segments: &[&str]) -> Self {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self::for_path(config, &format!("/{}", path))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffState {
    Init,
    AttemptingHandoff,
    /// The page went hidden first: the app is in the foreground.
    HandedOff,
    /// The timer fired with the page still visible.
    FellBackToStore,
}

impl HandoffState {
    pub fn is_terminal(self) -> bool {
        matches!(self, HandoffState::HandedOff | HandoffState::FellBackToStore)
    }
}

/// A registered timer or observer that can be released.
pub trait Cancel {
    fn cancel(self: Box<Self>);
}

/// Browser capabilities the race needs. Implemented over `web_sys` in [`browser`].
pub trait HandoffHost {
    fn user_agent(&self) -> String;
    fn page_hidden(&self) -> bool;
    fn navigate(&self, url: &str);
    fn start_timer(&self, delay: Duration, on_fire: Box<dyn FnOnce()>) -> Option<Box<dyn Cancel>>;
    fn watch_hidden(&self, on_hidden: Box<dyn Fn()>) -> Option<Box<dyn Cancel>>;
}

struct RaceToken {
    state: Cell<HandoffState>,
    timer: RefCell<Option<Box<dyn Cancel>>>,
    watch: RefCell<Option<Box<dyn Cancel>>>,
}

impl RaceToken {
    // Only the first caller moves the race out of AttemptingHandoff.
    fn settle(&self, outcome: HandoffState) -> bool {
        if self.state.get() != HandoffState::AttemptingHandoff {
            return false;
        }
        self.state.set(outcome);
        true
    }

    fn release_timer(&self) {
        let timer = self.timer.borrow_mut().take();
        if let Some(timer) = timer {
            timer.cancel();
        }
    }

    fn release_watch(&self) {
        let watch = self.watch.borrow_mut().take();
        if let Some(watch) = watch {
            watch.cancel();
        }
    }
}

/// One hand-off attempt. Dropping it releases whatever is still registered.
pub struct HandoffRace {
    token: Rc<RaceToken>,
}

impl HandoffRace {
    pub fn start<H>(host: Rc<H>, targets: &DeepLinkTargets, timeout: Duration) -> HandoffRace
    where
        H: HandoffHost + 'static,
    {
        let token = Rc::new(RaceToken {
            state: Cell::new(HandoffState::Init),
            timer: RefCell::new(None),
            watch: RefCell::new(None),
        });
        token.state.set(HandoffState::AttemptingHandoff);

        let on_hidden = {
            let token = Rc::clone(&token);
            Box::new(move || {
                if token.settle(HandoffState::HandedOff) {
                    log!("[DEEPLINK] Page hidden, app took over");
                    token.release_timer();
                    token.release_watch();
                }
            })
        };
        let watch = host.watch_hidden(on_hidden);
        *token.watch.borrow_mut() = watch;

        let on_fire = {
            let token = Rc::clone(&token);
            let host = Rc::clone(&host);
            let store_url = targets.app_store.clone();
            Box::new(move || {
                // A throttled background timer can still fire; hidden means the app opened.
                if host.page_hidden() {
                    if token.settle(HandoffState::HandedOff) {
                        token.release_watch();
                    }
                    return;
                }
                if token.settle(HandoffState::FellBackToStore) {
                    token.release_watch();
                    log!("[DEEPLINK] No app responded, falling back to the App Store");
                    host.navigate(&store_url);
                }
            })
        };
        let timer = host.start_timer(timeout, on_fire);
        *token.timer.borrow_mut() = timer;

        log!("[DEEPLINK] Attempting hand-off to {}", targets.custom_scheme);
        host.navigate(&targets.custom_scheme);

        HandoffRace { token }
    }

    pub fn state(&self) -> HandoffState {
        self.token.state.get()
    }

    /// Releases the timer and the observer without changing state.
    pub fn cancel(&self) {
        self.token.release_timer();
        self.token.release_watch();
    }
}

impl Drop for HandoffRace {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Outcome of [`resolve`].
pub enum Resolution {
    /// Not a platform with a native app: show the web fallback right away.
    WebFallback,
    Racing(HandoffRace),
}

pub fn resolve<H>(host: Rc<H>, config: &DeepLinkConfig, targets: &DeepLinkTargets) -> Resolution
where
    H: HandoffHost + 'static,
{
    if !Platform::detect(&host.user_agent()).has_native_app() {
        return Resolution::WebFallback;
    }
    Resolution::Racing(HandoffRace::start(host, targets, config.handoff_timeout()))
}
