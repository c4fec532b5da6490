//! Dashboard chrome state: sidebar collapse with a persistence collaborator
//! and an explicit dropdown state machine.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// Persistence collaborator for UI preferences. A missing or unreadable
/// value reads as `None`; writes are fire-and-forget from the controller's
/// point of view.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load_sidebar_collapsed(&self) -> Option<bool>;
    async fn store_sidebar_collapsed(&self, collapsed: bool);
}

/// Volatile store for tests and single-session use.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    sidebar_collapsed: Mutex<Option<bool>>,
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load_sidebar_collapsed(&self) -> Option<bool> {
        *self.sidebar_collapsed.lock().await
    }

    async fn store_sidebar_collapsed(&self, collapsed: bool) {
        *self.sidebar_collapsed.lock().await = Some(collapsed);
    }
}

/// Component-owned sidebar state. Reads the persisted flag once at startup
/// and writes it back on every toggle.
pub struct SidebarController {
    store: Arc<dyn PreferenceStore>,
    collapsed: Mutex<bool>,
}

impl SidebarController {
    pub async fn restore(store: Arc<dyn PreferenceStore>) -> Self {
        let collapsed = store.load_sidebar_collapsed().await.unwrap_or(false);
        Self {
            store,
            collapsed: Mutex::new(collapsed),
        }
    }

    pub async fn is_collapsed(&self) -> bool {
        *self.collapsed.lock().await
    }

    pub async fn toggle(&self) -> bool {
        let collapsed = {
            let mut collapsed = self.collapsed.lock().await;
            *collapsed = !*collapsed;
            *collapsed
        };
        self.store.store_sidebar_collapsed(collapsed).await;
        debug!(collapsed, "sidebar toggled");
        collapsed
    }
}

/// Explicit open/closed state for a hover dropdown menu.
#[derive(Debug, Default)]
pub struct DropdownMenu {
    open: bool,
}

impl DropdownMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pointer_entered(&mut self) {
        self.open = true;
    }

    pub fn pointer_left(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }
}

#[cfg(test)]
#[path = "tests/chrome_tests.rs"]
mod tests;
