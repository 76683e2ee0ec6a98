//! Permission evaluation: may this subject log in as the requested role, now,
//! from this address?
//!
//! - No IO
//! - No panics
//! - Fail closed: anything unparseable denies

use jitgate_core::{AuthError, AuthResult, EvaluationContext, NetworkEntry};

use crate::{PermissionSet, Role};

/// Decide whether `perms` allows logging in as `requested_username`.
///
/// Checks run cheapest first and the first failure wins:
/// 1. requested username is non-empty
/// 2. a role with that name was granted
/// 3. the role has not expired (expiry is inclusive: `expires_at == now` denies)
/// 4. the remote host is inside one of the role's allowed networks, if any
pub fn evaluate(
    perms: &PermissionSet,
    requested_username: &str,
    ctx: &EvaluationContext,
) -> AuthResult<()> {
    if requested_username.is_empty() {
        return Err(AuthError::EmptyUser);
    }

    let role = perms
        .find_role(requested_username)
        .ok_or_else(|| AuthError::RoleNotPermitted(requested_username.to_string()))?;

    check_expiry(role, ctx)?;
    check_origin(role, ctx)?;

    Ok(())
}

fn check_expiry(role: &Role, ctx: &EvaluationContext) -> AuthResult<()> {
    match role.expiry()? {
        Some(expires_at) if expires_at <= ctx.evaluated_at() => Err(AuthError::AccessExpired),
        _ => Ok(()),
    }
}

fn check_origin(role: &Role, ctx: &EvaluationContext) -> AuthResult<()> {
    if !role.is_origin_restricted() {
        return Ok(());
    }

    let Some(addr) = ctx.remote_host().ip() else {
        tracing::warn!(
            role = %role.name,
            rhost = %ctx.remote_host(),
            "remote host is not an address; denying origin-restricted role"
        );
        return Err(AuthError::OriginNotAllowed);
    };

    let mut matched = false;
    for entry in &role.allowed_networks {
        match entry {
            NetworkEntry::Range(range) => {
                if range.contains(addr) {
                    matched = true;
                }
            }
            NetworkEntry::Malformed(raw) => {
                tracing::warn!(role = %role.name, entry = %raw, "skipping malformed network entry");
            }
        }
    }

    if matched {
        Ok(())
    } else {
        Err(AuthError::OriginNotAllowed)
    }
}
