//! Settings Model
//!
//! Single configuration object persisted under one key. Every top-level
//! section carries `#[serde(default)]` so a partial or older stored shape
//! shallow-merges against the section defaults on load.

use crate::models::{Priority, WorkOrderStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// Resolve to a concrete light/dark choice.
    ///
    /// `ambient_dark` is the host environment's ambient preference
    /// (the `prefers-color-scheme` equivalent), only consulted for `System`.
    pub fn resolve(&self, ambient_dark: bool) -> ResolvedTheme {
        match self {
            Self::Dark => ResolvedTheme::Dark,
            Self::Light => ResolvedTheme::Light,
            Self::System => {
                if ambient_dark {
                    ResolvedTheme::Dark
                } else {
                    ResolvedTheme::Light
                }
            }
        }
    }
}

/// Concrete theme after resolving `ThemeMode::System`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    Light,
    Dark,
}

/// Company profile section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "My Telecom".to_string(),
            doc: None,
            phone: None,
            email: None,
            address: None,
        }
    }
}

/// SLA targets: resolution hours per priority tier (configuration only,
/// no enforcement logic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaSettings {
    pub hours_by_priority: BTreeMap<Priority, u32>,
}

impl Default for SlaSettings {
    fn default() -> Self {
        Self {
            hours_by_priority: BTreeMap::from([
                (Priority::Low, 72),
                (Priority::Medium, 24),
                (Priority::High, 8),
                (Priority::Critical, 4),
            ]),
        }
    }
}

/// Kanban section: WIP limit per column (`None` = unlimited; display-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanSettings {
    pub wip: BTreeMap<WorkOrderStatus, Option<u32>>,
}

impl Default for KanbanSettings {
    fn default() -> Self {
        Self {
            wip: BTreeMap::from([
                (WorkOrderStatus::Pending, None),
                (WorkOrderStatus::InProgress, Some(10)),
                (WorkOrderStatus::Completed, None),
                (WorkOrderStatus::Cancelled, None),
            ]),
        }
    }
}

/// Notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enable_desktop: bool,
    pub enable_email: bool,
    pub daily_digest: bool,
}

/// Custom display-label overrides (visual only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelOverrides {
    #[serde(default)]
    pub status: BTreeMap<WorkOrderStatus, String>,
    #[serde(default)]
    pub priority: BTreeMap<Priority, String>,
}

/// Application settings (exactly one instance, persisted under one key)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub company: CompanyProfile,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub sla: SlaSettings,
    #[serde(default)]
    pub kanban: KanbanSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub labels: LabelOverrides,
}

impl Settings {
    /// Display label for a status, honoring overrides
    pub fn status_label(&self, status: WorkOrderStatus) -> &str {
        self.labels
            .status
            .get(&status)
            .map_or_else(|| status.label(), String::as_str)
    }

    /// Display label for a priority, honoring overrides
    pub fn priority_label(&self, priority: Priority) -> &str {
        self.labels
            .priority
            .get(&priority)
            .map_or_else(|| priority.label(), String::as_str)
    }
}

/// Settings patch: merges one or more top-level sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub company: Option<CompanyProfile>,
    pub theme: Option<ThemeMode>,
    pub sla: Option<SlaSettings>,
    pub kanban: Option<KanbanSettings>,
    pub notifications: Option<NotificationSettings>,
    pub labels: Option<LabelOverrides>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.theme, ThemeMode::System);
        assert_eq!(s.sla.hours_by_priority[&Priority::Critical], 4);
        assert_eq!(s.kanban.wip[&WorkOrderStatus::InProgress], Some(10));
        assert_eq!(s.kanban.wip[&WorkOrderStatus::Pending], None);
        assert!(!s.notifications.daily_digest);
    }

    #[test]
    fn partial_stored_shape_merges_section_defaults() {
        // Older blob with only a theme: every other section falls back
        let s: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(s.theme, ThemeMode::Dark);
        assert_eq!(s.company.name, "My Telecom");
        assert_eq!(s.sla.hours_by_priority[&Priority::Low], 72);
    }

    #[test]
    fn theme_resolution_rule() {
        assert_eq!(ThemeMode::Dark.resolve(false), ResolvedTheme::Dark);
        assert_eq!(ThemeMode::Light.resolve(true), ResolvedTheme::Light);
        assert_eq!(ThemeMode::System.resolve(true), ResolvedTheme::Dark);
        assert_eq!(ThemeMode::System.resolve(false), ResolvedTheme::Light);
    }

    #[test]
    fn label_overrides_take_precedence() {
        let mut s = Settings::default();
        assert_eq!(s.status_label(WorkOrderStatus::Pending), "Pending");
        s.labels
            .status
            .insert(WorkOrderStatus::Pending, "Backlog".to_string());
        assert_eq!(s.status_label(WorkOrderStatus::Pending), "Backlog");
    }
}
