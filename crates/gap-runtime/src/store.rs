//! # Session Stores
//!
//! Typed reactive state shared across flows. Each [`Store`] owns its
//! initial value, so a reset is always well-defined.
//!
//! ## Lifecycle
//!
//! ```text
//!  SessionStores::new()  ──►  set / update  ──►  logout()
//!     (app mount)            (subscribers wake)    (every store back to its initial value)
//! ```

use parking_lot::RwLock;
use shared_types::{Address, ChainId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

use crate::model::Project;

/// A single reactive value.
pub struct Store<T> {
    name: &'static str,
    initial: T,
    sender: watch::Sender<T>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Store starting at (and resetting to) `initial`.
    pub fn init(name: &'static str, initial: T) -> Self {
        let (sender, _) = watch::channel(initial.clone());
        Self {
            name,
            initial,
            sender,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Mutate in place; subscribers are notified once.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    pub fn reset(&self) {
        debug!("[gap-runtime] Resetting store {}", self.name);
        self.sender.send_replace(self.initial.clone());
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Store<T> {
    pub fn new(name: &'static str) -> Self {
        Self::init(name, T::default())
    }
}

/// Wallet authentication state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Disconnected,
    Connected { address: Address, chain_id: ChainId },
}

impl AuthState {
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Disconnected => None,
            Self::Connected { address, .. } => Some(*address),
        }
    }
}

/// Per-session state containers.
pub struct SessionStores {
    pub auth: Store<AuthState>,
    /// Project the user is looking at (slug or uid).
    pub selected_project: Store<Option<String>>,
    /// Last fetched aggregate per project reference.
    pub projects: Store<HashMap<String, Project>>,
    /// Per-reference guard so two background refreshes don't interleave writes.
    refreshing: RwLock<HashMap<String, u64>>,
    generation: AtomicU64,
}

impl SessionStores {
    pub fn new() -> Self {
        Self {
            auth: Store::new("auth"),
            selected_project: Store::new("selected_project"),
            projects: Store::new("projects"),
            refreshing: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Ticket ordering concurrent refreshes; later tickets win.
    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn cached_project(&self, reference: &str) -> Option<Project> {
        self.projects.get().get(reference).cloned()
    }

    /// Cache `project` under `reference`, unless a newer refresh already did.
    pub(crate) fn cache_project(&self, reference: &str, generation: u64, project: Project) -> bool {
        {
            let mut refreshing = self.refreshing.write();
            let latest = refreshing.entry(reference.to_string()).or_insert(0);
            if generation < *latest {
                return false;
            }
            *latest = generation;
        }
        self.projects.update(|projects| {
            projects.insert(reference.to_string(), project);
        });
        true
    }

    /// Drop every piece of session state.
    pub fn logout(&self) {
        self.auth.reset();
        self.selected_project.reset();
        self.projects.reset();
        self.refreshing.write().clear();
    }
}

impl Default for SessionStores {
    fn default() -> Self {
        Self::new()
    }
}
