//! PAM module arguments (`key=value` entries from the PAM stack configuration).

use jitgate_core::{AuthError, AuthResult};

/// Module configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Trust connections from loopback addresses, the way
    /// `host all all 127.0.0.1/32 trust` does in `pg_hba.conf`.
    pub trust_local: bool,

    /// Authorization API endpoint used for PAT and JWT logins.
    pub api_url: Option<String>,
}

impl ModuleConfig {
    /// Parse module arguments.
    ///
    /// Recognized keys are `trustLocal` (value ignored) and `apiUrl`. An entry
    /// without `=` or with an unknown key is an error.
    pub fn from_args<I, S>(args: I) -> AuthResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();

        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| AuthError::config(format!("malformed arg: {arg}")))?;

            match key {
                "trustLocal" => config.trust_local = true,
                "apiUrl" => {
                    let value = value.trim();
                    config.api_url = (!value.is_empty()).then(|| value.to_string());
                }
                other => return Err(AuthError::config(format!("unknown option: {other}"))),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_are_defaults() {
        let config = ModuleConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, ModuleConfig::default());
    }

    #[test]
    fn parses_known_keys() {
        let config = ModuleConfig::from_args([
            "trustLocal=",
            "apiUrl=https://api.example.com/v1/authz",
        ])
        .unwrap();
        assert!(config.trust_local);
        assert_eq!(
            config.api_url.as_deref(),
            Some("https://api.example.com/v1/authz")
        );
    }

    #[test]
    fn trust_local_value_is_ignored() {
        let config = ModuleConfig::from_args(["trustLocal=false"]).unwrap();
        assert!(config.trust_local);
    }

    #[test]
    fn url_may_contain_equals_sign() {
        let config = ModuleConfig::from_args(["apiUrl=https://api.example.com/authz?x=1"]).unwrap();
        assert_eq!(
            config.api_url.as_deref(),
            Some("https://api.example.com/authz?x=1")
        );
    }

    #[test]
    fn empty_url_is_unset() {
        let config = ModuleConfig::from_args(["apiUrl="]).unwrap();
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn missing_equals_is_rejected() {
        assert_eq!(
            ModuleConfig::from_args(["trustLocal"]),
            Err(AuthError::config("malformed arg: trustLocal"))
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            ModuleConfig::from_args(["debug=1"]),
            Err(AuthError::config("unknown option: debug"))
        );
    }
}
