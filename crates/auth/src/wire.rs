//! Authorization API wire format.
//!
//! The API has shipped more than one response shape (a single `user_role` object
//! vs. a `roles` list; nested v4/v6 CIDR lists vs. a flat `allowed_ips` list).
//! Everything is decoded here into the canonical [`PermissionSet`].

use serde::{Deserialize, Serialize};

use jitgate_core::{AuthError, AuthResult, NetworkEntry};

use crate::{PermissionSet, Role};

/// Request body of the context-augmented POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthzRequest<'a> {
    pub role: &'a str,
    pub rhost: &'a str,
}

#[derive(Debug, Deserialize)]
struct WirePermissionSet {
    #[serde(default, alias = "subject_id")]
    user_id: Option<String>,

    #[serde(default, alias = "user_roles")]
    roles: Option<Vec<WireRole>>,

    #[serde(default)]
    user_role: Option<WireRole>,
}

#[derive(Debug, Deserialize)]
struct WireRole {
    role: String,

    #[serde(default)]
    expires_at: Option<WireExpiry>,

    #[serde(default)]
    allowed_ips: Option<Vec<String>>,

    #[serde(default)]
    allowed_networks: Option<WireNetworks>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireExpiry {
    Text(String),
    Millis(i64),
}

#[derive(Debug, Default, Deserialize)]
struct WireNetworks {
    #[serde(default)]
    allowed_cidrs: Option<Vec<WireCidr>>,

    #[serde(default)]
    allowed_cidrs_v6: Option<Vec<WireCidr>>,
}

#[derive(Debug, Deserialize)]
struct WireCidr {
    #[serde(default)]
    cidr: String,
}

impl From<WireRole> for Role {
    fn from(wire: WireRole) -> Self {
        let expires_at = wire.expires_at.map(|e| match e {
            WireExpiry::Text(s) => s,
            WireExpiry::Millis(ms) => ms.to_string(),
        });

        let mut allowed_networks: Vec<NetworkEntry> = Vec::new();

        if let Some(ips) = wire.allowed_ips {
            allowed_networks.extend(ips.iter().map(|ip| NetworkEntry::parse(ip)));
        }

        if let Some(networks) = wire.allowed_networks {
            let v4 = networks.allowed_cidrs.unwrap_or_default();
            let v6 = networks.allowed_cidrs_v6.unwrap_or_default();
            allowed_networks.extend(
                v4.iter()
                    .chain(v6.iter())
                    .map(|c| NetworkEntry::parse(&c.cidr)),
            );
        }

        Role {
            name: wire.role,
            expires_at,
            allowed_networks,
        }
    }
}

/// Decode a 200 response body. Any decode failure is a [`AuthError::Protocol`].
pub fn decode_permission_set(body: &[u8]) -> AuthResult<PermissionSet> {
    let wire: WirePermissionSet =
        serde_json::from_slice(body).map_err(|e| AuthError::protocol(e.to_string()))?;

    let mut roles: Vec<Role> = wire
        .roles
        .unwrap_or_default()
        .into_iter()
        .map(Role::from)
        .collect();

    if let Some(single) = wire.user_role {
        roles.push(single.into());
    }

    Ok(PermissionSet {
        subject_id: wire.user_id.unwrap_or_default(),
        roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jitgate_core::CidrRange;

    fn range(s: &str) -> NetworkEntry {
        NetworkEntry::Range(s.parse::<CidrRange>().unwrap())
    }

    #[test]
    fn role_list_with_flat_ips() {
        let body = br#"{
            "user_id": "99cf6d1d-7c39-46b4-bc58-688f6dd897ad",
            "roles": [
                {"role": "postgres", "expires_at": "1753953144000", "allowed_ips": ["127.0.0.0/8", "::1"]},
                {"role": "supabase_read_only_user"}
            ]
        }"#;

        let perms = decode_permission_set(body).unwrap();
        assert_eq!(perms.subject_id, "99cf6d1d-7c39-46b4-bc58-688f6dd897ad");
        assert_eq!(
            perms.role_names(),
            vec!["postgres", "supabase_read_only_user"]
        );

        let postgres = &perms.roles[0];
        assert_eq!(postgres.expires_at.as_deref(), Some("1753953144000"));
        assert_eq!(
            postgres.allowed_networks,
            vec![range("127.0.0.0/8"), range("::1")]
        );

        assert!(perms.roles[1].allowed_networks.is_empty());
        assert!(perms.roles[1].expires_at.is_none());
    }

    #[test]
    fn single_role_with_nested_cidrs() {
        let body = br#"{
            "user_id": "abc",
            "user_role": {
                "role": "postgres",
                "allowed_networks": {
                    "allowed_cidrs": [{"cidr": "10.0.0.0/8"}],
                    "allowed_cidrs_v6": [{"cidr": "2001:db8::/32"}]
                }
            }
        }"#;

        let perms = decode_permission_set(body).unwrap();
        assert_eq!(perms.roles.len(), 1);
        assert_eq!(
            perms.roles[0].allowed_networks,
            vec![range("10.0.0.0/8"), range("2001:db8::/32")]
        );
    }

    #[test]
    fn numeric_expiry_is_accepted() {
        let body = br#"{"roles": [{"role": "postgres", "expires_at": 1753953144000}]}"#;
        let perms = decode_permission_set(body).unwrap();
        assert_eq!(perms.roles[0].expires_at.as_deref(), Some("1753953144000"));
    }

    #[test]
    fn null_fields_mean_unrestricted() {
        let body = br#"{"roles": [{"role": "postgres", "expires_at": null, "allowed_ips": null, "allowed_networks": null}]}"#;
        let perms = decode_permission_set(body).unwrap();
        assert!(perms.roles[0].expires_at.is_none());
        assert!(perms.roles[0].allowed_networks.is_empty());
    }

    #[test]
    fn malformed_cidr_is_kept_as_malformed() {
        let body = br#"{"roles": [{"role": "postgres", "allowed_ips": ["nope"]}]}"#;
        let perms = decode_permission_set(body).unwrap();
        assert_eq!(
            perms.roles[0].allowed_networks,
            vec![NetworkEntry::Malformed("nope".to_string())]
        );
    }

    #[test]
    fn missing_roles_decode_to_empty_set() {
        let perms = decode_permission_set(br#"{"user_id": "abc"}"#).unwrap();
        assert!(perms.roles.is_empty());
    }

    #[test]
    fn garbage_is_protocol_error() {
        assert!(matches!(
            decode_permission_set(b"<html>oops</html>"),
            Err(AuthError::Protocol(_))
        ));
        assert!(matches!(
            decode_permission_set(br#"{"roles": [{"expires_at": "1"}]}"#),
            Err(AuthError::Protocol(_))
        ));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(AuthzRequest {
            role: "postgres",
            rhost: "10.1.2.3",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"role": "postgres", "rhost": "10.1.2.3"})
        );
    }
}
