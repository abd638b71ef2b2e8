//! Settings store
//!
//! One [`Settings`] object persisted under a single key. Absent or
//! undecodable stored content loads as full defaults; a stored partial
//! shape shallow-merges per top-level section (serde defaults on the
//! model). Theme changes are pushed to an injected [`ThemeSink`] so the
//! presentation layer never polls.

use crate::storage::KvStore;
use crate::store::StoreResult;
use parking_lot::RwLock;
use shared::models::{ResolvedTheme, Settings, SettingsPatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) const SETTINGS_KEY: &str = "settings";

/// Presentation-layer collaborator receiving resolved theme changes
pub trait ThemeSink: Send + Sync {
    fn apply_theme(&self, theme: ResolvedTheme);
}

/// Settings store over an injected [`KvStore`]
pub struct SettingsStore {
    kv: KvStore,
    current: RwLock<Settings>,
    sink: RwLock<Option<Arc<dyn ThemeSink>>>,
    /// Host environment's ambient dark-mode preference, pushed by the shell
    ambient_dark: AtomicBool,
}

impl SettingsStore {
    /// Load settings from storage, falling back to defaults when the key
    /// is absent or its content is malformed
    pub fn open(kv: KvStore) -> StoreResult<Self> {
        let current = kv.get::<Settings>(SETTINGS_KEY)?.unwrap_or_default();
        Ok(Self {
            kv,
            current: RwLock::new(current),
            sink: RwLock::new(None),
            ambient_dark: AtomicBool::new(false),
        })
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Settings {
        self.current.read().clone()
    }

    /// Attach the theme collaborator and immediately push the resolved mode
    pub fn set_theme_sink(&self, sink: Arc<dyn ThemeSink>) {
        sink.apply_theme(self.resolved_theme());
        *self.sink.write() = Some(sink);
    }

    /// Record the host's ambient preference and re-apply if it matters
    pub fn set_ambient_dark(&self, ambient_dark: bool) {
        self.ambient_dark.store(ambient_dark, Ordering::Relaxed);
        self.apply_theme();
    }

    /// Resolve the configured mode against the ambient preference
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.current
            .read()
            .theme
            .resolve(self.ambient_dark.load(Ordering::Relaxed))
    }

    /// Push the resolved theme to the attached sink, if any
    pub fn apply_theme(&self) {
        if let Some(sink) = self.sink.read().as_ref() {
            sink.apply_theme(self.resolved_theme());
        }
    }

    /// Persist the full object; theme changes reach the sink
    pub fn save(&self, settings: Settings) -> StoreResult<()> {
        let theme_changed = {
            let mut current = self.current.write();
            let theme_changed = current.theme != settings.theme;
            self.kv.set(SETTINGS_KEY, &settings)?;
            *current = settings;
            theme_changed
        };
        if theme_changed {
            self.apply_theme();
        }
        Ok(())
    }

    /// Merge one or more top-level sections, persist, and return the result
    pub fn patch(&self, patch: SettingsPatch) -> StoreResult<Settings> {
        let mut next = self.settings();
        if let Some(company) = patch.company {
            next.company = company;
        }
        if let Some(theme) = patch.theme {
            next.theme = theme;
        }
        if let Some(sla) = patch.sla {
            next.sla = sla;
        }
        if let Some(kanban) = patch.kanban {
            next.kanban = kanban;
        }
        if let Some(notifications) = patch.notifications {
            next.notifications = notifications;
        }
        if let Some(labels) = patch.labels {
            next.labels = labels;
        }
        self.save(next.clone())?;
        Ok(next)
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("current", &*self.current.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shared::models::ThemeMode;

    struct RecordingSink(Mutex<Vec<ResolvedTheme>>);

    impl ThemeSink for RecordingSink {
        fn apply_theme(&self, theme: ResolvedTheme) {
            self.0.lock().push(theme);
        }
    }

    fn store() -> SettingsStore {
        SettingsStore::open(KvStore::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn loads_defaults_when_absent() {
        let s = store().settings();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn loads_defaults_when_malformed() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set_raw(SETTINGS_KEY, b"][").unwrap();
        let store = SettingsStore::open(kv).unwrap();
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn save_persists_across_reopen() {
        let kv = KvStore::open_in_memory().unwrap();
        {
            let store = SettingsStore::open(kv.clone()).unwrap();
            let mut s = store.settings();
            s.company.name = "Northwind Fiber".to_string();
            s.theme = ThemeMode::Dark;
            store.save(s).unwrap();
        }
        let store = SettingsStore::open(kv).unwrap();
        assert_eq!(store.settings().company.name, "Northwind Fiber");
        assert_eq!(store.settings().theme, ThemeMode::Dark);
    }

    #[test]
    fn patch_merges_only_named_sections() {
        let store = store();
        let before = store.settings();
        let after = store
            .patch(SettingsPatch {
                theme: Some(ThemeMode::Light),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(after.theme, ThemeMode::Light);
        assert_eq!(after.company, before.company);
        assert_eq!(after.sla, before.sla);
        assert_eq!(after.kanban, before.kanban);
    }

    #[test]
    fn theme_change_reaches_sink() {
        let store = store();
        let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
        store.set_theme_sink(sink.clone());
        // attach pushes the initial resolution (system + light ambient)
        assert_eq!(sink.0.lock().as_slice(), &[ResolvedTheme::Light]);

        store
            .patch(SettingsPatch {
                theme: Some(ThemeMode::Dark),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(sink.0.lock().last(), Some(&ResolvedTheme::Dark));

        // ambient flip under `system` re-applies
        store
            .patch(SettingsPatch {
                theme: Some(ThemeMode::System),
                ..Default::default()
            })
            .unwrap();
        store.set_ambient_dark(true);
        assert_eq!(sink.0.lock().last(), Some(&ResolvedTheme::Dark));
        store.set_ambient_dark(false);
        assert_eq!(sink.0.lock().last(), Some(&ResolvedTheme::Light));
    }
}
