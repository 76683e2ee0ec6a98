use chrono::{DateTime, Utc};

use jitgate_core::{AuthError, NetworkEntry};

/// A database role the subject may assume, with the constraints attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Database user name this grant is for.
    pub name: String,

    /// Millisecond epoch timestamp, as received. `None` means no expiry.
    pub expires_at: Option<String>,

    /// Networks the role may be used from. Empty means no origin restriction.
    pub allowed_networks: Vec<NetworkEntry>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expires_at: None,
            allowed_networks: Vec::new(),
        }
    }

    pub fn expiring_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    pub fn allow_from<I, S>(mut self, networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_networks
            .extend(networks.into_iter().map(|n| NetworkEntry::parse(n.as_ref())));
        self
    }

    /// Parsed expiry.
    ///
    /// An expiry that is present but unparseable is an error, never "no expiry".
    pub fn expiry(&self) -> Result<Option<DateTime<Utc>>, AuthError> {
        let Some(raw) = &self.expires_at else {
            return Ok(None);
        };

        let millis = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidExpiry(raw.clone()))?;

        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| AuthError::InvalidExpiry(raw.clone()))
    }

    pub fn is_origin_restricted(&self) -> bool {
        !self.allowed_networks.is_empty()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_expiry_is_none() {
        assert_eq!(Role::new("postgres").expiry(), Ok(None));
    }

    #[test]
    fn millisecond_expiry_parses() {
        let role = Role::new("postgres").expiring_at("1753953144000");
        let expiry = role.expiry().unwrap().unwrap();
        assert_eq!(expiry.timestamp_millis(), 1_753_953_144_000);
    }

    #[test]
    fn garbage_expiry_fails_closed() {
        for raw in ["", "tomorrow", "2025-07-31T00:00:00Z", "1.5"] {
            let role = Role::new("postgres").expiring_at(raw);
            assert_eq!(
                role.expiry(),
                Err(AuthError::InvalidExpiry(raw.to_string()))
            );
        }
    }

    #[test]
    fn out_of_range_expiry_fails_closed() {
        let raw = i64::MAX.to_string();
        let role = Role::new("postgres").expiring_at(raw.clone());
        assert_eq!(role.expiry(), Err(AuthError::InvalidExpiry(raw)));
    }

    #[test]
    fn malformed_networks_still_restrict() {
        let role = Role::new("postgres").allow_from(["not-a-cidr"]);
        assert!(role.is_origin_restricted());
    }
}
