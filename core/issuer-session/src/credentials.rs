//! The process-wide credential, its persistence and change notification.
//!
//! A [`CredentialStore`] is created once by the application root and handed
//! to everything that needs authenticated access. Clones share state.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use issuer_types::{Credential, IssuerId};
use tracing::{info, warn};

use crate::error::SessionResult;
use crate::kv::KeyValueStore;

/// Key the serialized credential is persisted under.
pub const CREDENTIAL_KEY: &str = "credential";

type Callback = Arc<dyn Fn(&Credential) + Send + Sync>;

struct State {
    current: Credential,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

struct Inner {
    kv: Arc<dyn KeyValueStore>,
    state: Mutex<State>,
    /// Held from swap through the last callback so notifications arrive in
    /// the order the changes were made.
    notify: Mutex<()>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_notify(&self) -> MutexGuard<'_, ()> {
        self.notify.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, credential: &Credential) -> SessionResult<()> {
        let raw = serde_json::to_string(credential)?;
        self.kv.set(CREDENTIAL_KEY, &raw)
    }
}

/// Replaces the current value and returns the callbacks to notify.
fn swap(state: &mut State, credential: &Credential) -> Vec<Callback> {
    if state.current.is_logged_in() != credential.is_logged_in() {
        info!(
            logged_in = credential.is_logged_in(),
            issuer_id = credential.issuer_id,
            "credential changed"
        );
    }
    state.current = credential.clone();
    state.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
}

fn notify(subscribers: Vec<Callback>, credential: &Credential) {
    for cb in subscribers {
        cb(credential);
    }
}

/// Read-only projections of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    pub logged_in: bool,
    pub issuer_id: IssuerId,
    pub privileged: bool,
}

impl From<&Credential> for SessionView {
    fn from(c: &Credential) -> Self {
        Self {
            logged_in: c.is_logged_in(),
            issuer_id: c.issuer_id,
            privileged: c.is_privileged(),
        }
    }
}

/// Holds the current credential, persists it and publishes changes.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

impl CredentialStore {
    /// Loads the persisted credential from `kv`.
    ///
    /// A missing, unreadable or malformed entry yields the anonymous
    /// credential; startup never fails because of stale client state.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let current = match kv.get(CREDENTIAL_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "persisted credential is malformed, starting logged out");
                Credential::default()
            }),
            Ok(None) => Credential::default(),
            Err(e) => {
                warn!(error = %e, "could not read persisted credential, starting logged out");
                Credential::default()
            }
        };

        Self {
            inner: Arc::new(Inner {
                kv,
                state: Mutex::new(State {
                    current,
                    subscribers: Vec::new(),
                    next_id: 0,
                }),
                notify: Mutex::new(()),
            }),
        }
    }

    /// Returns the current credential.
    #[must_use]
    pub fn get(&self) -> Credential {
        self.inner.lock().current.clone()
    }

    /// Replaces the credential, persists it and notifies subscribers.
    ///
    /// The write is persisted before the in-memory value changes; if
    /// persisting fails nothing changes and no subscriber is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential could not be persisted.
    pub fn set(&self, credential: Credential) -> SessionResult<()> {
        let _order = self.inner.lock_notify();
        let subscribers = {
            let mut state = self.inner.lock();
            self.inner.persist(&credential)?;
            swap(&mut state, &credential)
        };
        notify(subscribers, &credential);
        Ok(())
    }

    /// Resets to the anonymous credential (logout).
    ///
    /// The in-memory value is reset and subscribers are notified even if the
    /// reset cannot be persisted, so a rejected token is never reused by this
    /// process.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset could not be persisted. Memory is
    /// anonymous either way.
    pub fn clear(&self) -> SessionResult<()> {
        let credential = Credential::default();
        let _order = self.inner.lock_notify();
        let (subscribers, persisted) = {
            let mut state = self.inner.lock();
            let subscribers = swap(&mut state, &credential);
            (subscribers, self.inner.persist(&credential))
        };
        notify(subscribers, &credential);
        if let Err(e) = &persisted {
            warn!(error = %e, "logged out in memory, but the reset was not persisted");
        }
        persisted
    }

    /// Registers `callback`, calling it now with the current credential and
    /// again after every [`set`](Self::set).
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called. Callbacks may read
    /// the store but must not call [`set`](Self::set) or
    /// [`clear`](Self::clear), which would deadlock.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Credential) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let _order = self.inner.lock_notify();
        let (id, current) = {
            let mut state = self.inner.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Arc::clone(&callback)));
            (id, state.current.clone())
        };

        callback(&current);

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Like [`subscribe`](Self::subscribe), but delivers the derived view.
    pub fn subscribe_view<F>(&self, callback: F) -> Subscription
    where
        F: Fn(SessionView) + Send + Sync + 'static,
    {
        self.subscribe(move |c| callback(SessionView::from(c)))
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// True if a token is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.lock().current.is_logged_in()
    }

    /// Issuer of the current credential (`-1` when logged out).
    #[must_use]
    pub fn issuer_id(&self) -> IssuerId {
        self.inner.lock().current.issuer_id
    }

    /// True for the administrative issuer.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.inner.lock().current.is_privileged()
    }

    /// All projections of the current credential.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from(&self.inner.lock().current)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("CredentialStore")
            .field("logged_in", &state.current.is_logged_in())
            .field("issuer_id", &state.current.issuer_id)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

/// Handle to a registered credential callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    /// Stops further notifications.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
