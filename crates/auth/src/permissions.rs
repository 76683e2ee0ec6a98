use crate::Role;

/// Permission set returned by the authorization API for one subject.
///
/// This is the canonical in-memory form; wire-format variations are handled by
/// [`crate::wire`] and never reach the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    /// Identity of the token holder, as reported by the API.
    pub subject_id: String,

    /// Granted roles, in the order the API listed them.
    pub roles: Vec<Role>,
}

impl PermissionSet {
    pub fn new(subject_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            subject_id: subject_id.into(),
            roles,
        }
    }

    /// First role granted under `name`, if any.
    pub fn find_role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_role_returns_first_match() {
        let perms = PermissionSet::new(
            "subject",
            vec![
                Role::new("postgres").expiring_at("1"),
                Role::new("postgres").expiring_at("2"),
            ],
        );
        let role = perms.find_role("postgres").unwrap();
        assert_eq!(role.expires_at.as_deref(), Some("1"));
        assert!(perms.find_role("other").is_none());
    }

    #[test]
    fn empty_set_has_no_roles() {
        let perms = PermissionSet::default();
        assert!(perms.find_role("postgres").is_none());
        assert!(perms.role_names().is_empty());
    }
}
