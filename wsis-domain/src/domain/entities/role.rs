use serde::{Deserialize, Serialize};

/// Role membership change for a single user: roles to drop and roles to add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleListUpdate {
    #[serde(default)]
    pub deleted_roles: Vec<String>,
    #[serde(default)]
    pub new_roles: Vec<String>,
}

impl RoleListUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, role: impl Into<String>) -> Self {
        self.new_roles.push(role.into());
        self
    }

    pub fn remove(mut self, role: impl Into<String>) -> Self {
        self.deleted_roles.push(role.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_roles.is_empty() && self.new_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_insertion_order() {
        let update = RoleListUpdate::new()
            .add("gateway-user")
            .add("admin")
            .remove("everyone");

        assert_eq!(update.new_roles, vec!["gateway-user", "admin"]);
        assert_eq!(update.deleted_roles, vec!["everyone"]);
        assert!(!update.is_empty());
        assert!(RoleListUpdate::new().is_empty());
    }
}
