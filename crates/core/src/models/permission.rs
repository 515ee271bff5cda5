use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Areas of the back-office that carry their own permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppModule {
    Collection,
    Finance,
    Dashboard,
}

impl std::fmt::Display for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppModule::Collection => write!(f, "Collection"),
            AppModule::Finance => write!(f, "Finance"),
            AppModule::Dashboard => write!(f, "Dashboard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::View => write!(f, "view"),
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// What a user may do within one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_update: bool,
    #[serde(default)]
    pub can_delete: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            can_view: true,
            can_create: true,
            can_update: true,
            can_delete: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            can_view: true,
            ..Self::default()
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.can_view,
            Action::Create => self.can_create,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
        }
    }
}

/// Capability set per module, supplied by the caller after login.
/// Modules with no entry grant nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions {
    modules: HashMap<AppModule, Capabilities>,
}

impl Permissions {
    /// Everything allowed everywhere (admin).
    pub fn full() -> Self {
        let mut p = Self::default();
        for module in [AppModule::Collection, AppModule::Finance, AppModule::Dashboard] {
            p.modules.insert(module, Capabilities::all());
        }
        p
    }

    pub fn grant(mut self, module: AppModule, caps: Capabilities) -> Self {
        self.modules.insert(module, caps);
        self
    }

    pub fn for_module(&self, module: AppModule) -> Capabilities {
        self.modules.get(&module).copied().unwrap_or_default()
    }

    pub fn allows(&self, module: AppModule, action: Action) -> bool {
        self.for_module(module).allows(action)
    }
}
