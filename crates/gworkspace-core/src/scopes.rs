//! Google Workspace OAuth Scopes
//!
//! Scope constants, the tool-to-scopes table, and the resolver that turns a
//! selection of enabled tool groups into the set of scopes to request.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

// ── Individual scopes ───────────────────────────────────────────────────────

pub const USERINFO_EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";
pub const USERINFO_PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";
pub const OPENID_SCOPE: &str = "openid";

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";
pub const GMAIL_COMPOSE_SCOPE: &str = "https://www.googleapis.com/auth/gmail.compose";
pub const GMAIL_MODIFY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";
pub const GMAIL_LABELS_SCOPE: &str = "https://www.googleapis.com/auth/gmail.labels";

pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";
pub const TASKS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/tasks.readonly";

pub const CONTACTS_SCOPE: &str = "https://www.googleapis.com/auth/contacts";
pub const CONTACTS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/contacts.readonly";

// ── Scope groups ────────────────────────────────────────────────────────────

/// Scopes required for user identification, requested regardless of tools.
pub const BASE_SCOPES: &[&str] = &[USERINFO_EMAIL_SCOPE, USERINFO_PROFILE_SCOPE, OPENID_SCOPE];

pub const CALENDAR_SCOPES: &[&str] = &[CALENDAR_SCOPE, CALENDAR_READONLY_SCOPE, CALENDAR_EVENTS_SCOPE];

pub const DRIVE_SCOPES: &[&str] = &[DRIVE_SCOPE, DRIVE_READONLY_SCOPE, DRIVE_FILE_SCOPE];

pub const GMAIL_SCOPES: &[&str] = &[
    GMAIL_READONLY_SCOPE,
    GMAIL_SEND_SCOPE,
    GMAIL_COMPOSE_SCOPE,
    GMAIL_MODIFY_SCOPE,
    GMAIL_LABELS_SCOPE,
];

pub const TASKS_SCOPES: &[&str] = &[TASKS_SCOPE, TASKS_READONLY_SCOPE];

pub const CONTACTS_SCOPES: &[&str] = &[CONTACTS_SCOPE, CONTACTS_READONLY_SCOPE];

// ── Tool groups ─────────────────────────────────────────────────────────────

pub const GMAIL: &str = "gmail";
pub const DRIVE: &str = "drive";
pub const CALENDAR: &str = "calendar";
pub const TASKS: &str = "tasks";
pub const CONTACTS: &str = "contacts";

/// Tool group name -> scopes that group needs. Built once, never mutated.
static TOOL_SCOPES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        (GMAIL, GMAIL_SCOPES),
        (DRIVE, DRIVE_SCOPES),
        (CALENDAR, CALENDAR_SCOPES),
        (TASKS, TASKS_SCOPES),
        (CONTACTS, CONTACTS_SCOPES),
    ])
});

/// All tool group names present in the table.
pub fn known_tools() -> impl Iterator<Item = &'static str> {
    TOOL_SCOPES.keys().copied()
}

/// Scopes for a single tool group, `None` if the group is unknown.
pub fn scopes_for_tool(tool: &str) -> Option<&'static [&'static str]> {
    TOOL_SCOPES.get(tool).copied()
}

/// Union of the base scopes and the scopes of every known tool in `tools`.
///
/// Unknown names contribute nothing.
pub fn scopes_for_tools<'a, I>(tools: I) -> HashSet<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scopes: HashSet<&'static str> = BASE_SCOPES.iter().copied().collect();
    for tool in tools {
        if let Some(tool_scopes) = scopes_for_tool(tool) {
            scopes.extend(tool_scopes.iter().copied());
        }
    }
    scopes
}

// ── Resolver ────────────────────────────────────────────────────────────────

/// Holds the enabled tool selection for a process and resolves scopes from it.
///
/// `None` means no selection was configured, which is read as "all tools".
#[derive(Debug, Default)]
pub struct ScopeResolver {
    enabled: RwLock<Option<HashSet<String>>>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with a selection already in place.
    pub fn with_enabled_tools<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolver = Self::new();
        resolver.set_enabled_tools(tools);
        resolver
    }

    /// Replace the enabled tool selection. Last write wins.
    pub fn set_enabled_tools<I, S>(&self, tools: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tools: HashSet<String> = tools.into_iter().map(Into::into).collect();

        for unknown in tools.iter().filter(|t| scopes_for_tool(t).is_none()) {
            warn!("Unknown tool '{}' enabled; it contributes no scopes", unknown);
        }

        info!("Enabled tools set for scope management: {:?}", tools);
        *self.enabled.write() = Some(tools);
    }

    /// The stored selection, or `None` when all tools are implied.
    pub fn selection(&self) -> Option<HashSet<String>> {
        self.enabled.read().clone()
    }

    /// Effective tool groups: the stored selection, else every known tool.
    pub fn enabled_tools(&self) -> HashSet<String> {
        match self.enabled.read().as_ref() {
            Some(tools) => tools.clone(),
            None => known_tools().map(String::from).collect(),
        }
    }

    /// Whether a tool group is part of the effective selection.
    pub fn is_enabled(&self, tool: &str) -> bool {
        match self.enabled.read().as_ref() {
            Some(tools) => tools.contains(tool),
            None => scopes_for_tool(tool).is_some(),
        }
    }

    /// Scopes for `tools` when given, else for the stored selection, else for
    /// all tools. Always includes [`BASE_SCOPES`].
    pub fn resolve_scopes<S: AsRef<str>>(&self, tools: Option<&[S]>) -> HashSet<&'static str> {
        let scopes = match tools {
            Some(explicit) => scopes_for_tools(explicit.iter().map(|t| t.as_ref())),
            None => match self.enabled.read().as_ref() {
                Some(stored) => scopes_for_tools(stored.iter().map(String::as_str)),
                None => scopes_for_tools(known_tools()),
            },
        };

        debug!("Resolved {} unique scopes", scopes.len());
        scopes
    }

    /// Scopes for the current selection. Same as `resolve_scopes(None)`.
    pub fn current_scopes(&self) -> HashSet<&'static str> {
        self.resolve_scopes::<&str>(None)
    }
}

/// Sorted view of a scope set, for output that must be stable.
pub fn sorted(scopes: &HashSet<&'static str>) -> Vec<&'static str> {
    let mut list: Vec<&'static str> = scopes.iter().copied().collect();
    list.sort_unstable();
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HashSet<&'static str> {
        BASE_SCOPES.iter().copied().collect()
    }

    #[test]
    fn test_table_entries_non_empty() {
        for tool in known_tools() {
            assert!(!scopes_for_tool(tool).unwrap().is_empty(), "{} has no scopes", tool);
        }
        assert_eq!(known_tools().count(), 5);
    }

    #[test]
    fn test_empty_selection_yields_base() {
        let resolver = ScopeResolver::new();
        let empty: [&str; 0] = [];
        assert_eq!(resolver.resolve_scopes(Some(&empty[..])), base());
    }

    #[test]
    fn test_unset_selection_yields_everything() {
        let resolver = ScopeResolver::new();
        let all = resolver.resolve_scopes::<&str>(None);

        let mut expected = base();
        for scopes in [GMAIL_SCOPES, DRIVE_SCOPES, CALENDAR_SCOPES, TASKS_SCOPES, CONTACTS_SCOPES] {
            expected.extend(scopes.iter().copied());
        }
        assert_eq!(all, expected);
        assert_eq!(all.len(), 18);
    }

    #[test]
    fn test_explicit_argument_overrides_stored() {
        let resolver = ScopeResolver::with_enabled_tools(["drive"]);

        let mut drive = base();
        drive.extend(DRIVE_SCOPES.iter().copied());
        assert_eq!(resolver.current_scopes(), drive);

        let mut tasks = base();
        tasks.extend(TASKS_SCOPES.iter().copied());
        assert_eq!(resolver.resolve_scopes(Some(&["tasks"][..])), tasks);

        // the explicit call does not touch the stored selection
        assert_eq!(resolver.current_scopes(), drive);
    }

    #[test]
    fn test_last_write_wins() {
        let resolver = ScopeResolver::new();
        resolver.set_enabled_tools(["gmail"]);
        resolver.set_enabled_tools(vec!["contacts".to_string(), "contacts".to_string()]);

        let selection = resolver.selection().unwrap();
        assert_eq!(selection.len(), 1);
        assert!(selection.contains("contacts"));
        assert!(!resolver.is_enabled("gmail"));
    }

    #[test]
    fn test_unknown_names_are_stored_but_ignored() {
        let resolver = ScopeResolver::with_enabled_tools(["not_a_real_tool"]);
        assert!(resolver.is_enabled("not_a_real_tool"));
        assert_eq!(resolver.current_scopes(), base());
    }

    #[test]
    fn test_enabled_tools_defaults_to_all_known() {
        let resolver = ScopeResolver::new();
        let enabled = resolver.enabled_tools();
        assert_eq!(enabled.len(), 5);
        assert!(resolver.is_enabled("calendar"));
        assert!(!resolver.is_enabled("photos"));
    }

    #[test]
    fn test_sorted_is_ordered() {
        let list = sorted(&scopes_for_tools(["tasks"]));
        let mut expected = list.clone();
        expected.sort();
        assert_eq!(list, expected);
        assert_eq!(list.len(), 5);
    }
}
