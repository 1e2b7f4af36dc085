use anyhow::{Context, Result};
use ecclesia_authz::Role;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_ADMIN_ROLE: &str = Role::ADMIN;
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_SEED_DEFAULT_ROLES: bool = true;

// Access engine configuration sourced from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    // Role that passes admin-bypass requirements unconditionally.
    pub admin_role: Role,
    // If false, every resolution reads through to the store.
    pub cache_enabled: bool,
    // Write built-in role matrices on startup when they are missing.
    pub seed_default_roles: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AccessConfigOverride {
    admin_role: Option<String>,
    cache_enabled: Option<bool>,
    seed_default_roles: Option<bool>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_role: Role::new(DEFAULT_ADMIN_ROLE),
            cache_enabled: DEFAULT_CACHE_ENABLED,
            seed_default_roles: DEFAULT_SEED_DEFAULT_ROLES,
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Result<Self> {
        let admin_role = match std::env::var("ECCLESIA_ADMIN_ROLE") {
            Ok(value) => Role::parse(&value).with_context(|| "parse ECCLESIA_ADMIN_ROLE")?,
            Err(_) => Role::new(DEFAULT_ADMIN_ROLE),
        };
        let cache_enabled = env_bool("ECCLESIA_PERMISSION_CACHE", DEFAULT_CACHE_ENABLED)?;
        let seed_default_roles = env_bool("ECCLESIA_SEED_ROLES", DEFAULT_SEED_DEFAULT_ROLES)?;
        Ok(Self {
            admin_role,
            cache_enabled,
            seed_default_roles,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ECCLESIA_ACCESS_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ECCLESIA_ACCESS_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AccessConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse access config yaml")?;
        if let Some(value) = override_cfg.admin_role {
            self.admin_role = Role::parse(&value).with_context(|| "parse admin_role")?;
        }
        if let Some(value) = override_cfg.cache_enabled {
            self.cache_enabled = value;
        }
        if let Some(value) = override_cfg.seed_default_roles {
            self.seed_default_roles = value;
        }
        Ok(())
    }
}

fn env_bool(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value).with_context(|| format!("parse {name}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const VARS: [&str; 4] = [
        "ECCLESIA_ADMIN_ROLE",
        "ECCLESIA_PERMISSION_CACHE",
        "ECCLESIA_SEED_ROLES",
        "ECCLESIA_ACCESS_CONFIG",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: env-mutating tests are serialized with `#[serial]`.
            unsafe { std::env::remove_var(var) };
        }
    }

    fn set_env(name: &str, value: &str) {
        // SAFETY: env-mutating tests are serialized with `#[serial]`.
        unsafe { std::env::set_var(name, value) };
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear_env();
        let config = AccessConfig::from_env().expect("config");
        assert_eq!(config, AccessConfig::default());
        assert!(config.admin_role.is_admin());
    }

    #[test]
    #[serial]
    fn env_overrides_defaults() {
        clear_env();
        set_env("ECCLESIA_ADMIN_ROLE", "Pastor");
        set_env("ECCLESIA_PERMISSION_CACHE", "off");
        set_env("ECCLESIA_SEED_ROLES", "0");
        let config = AccessConfig::from_env().expect("config");
        clear_env();
        assert_eq!(config.admin_role, Role::new("pastor"));
        assert!(!config.cache_enabled);
        assert!(!config.seed_default_roles);
    }

    #[test]
    #[serial]
    fn invalid_env_values_are_rejected() {
        clear_env();
        set_env("ECCLESIA_PERMISSION_CACHE", "maybe");
        let err = AccessConfig::from_env().expect_err("bad bool");
        clear_env();
        assert!(err.to_string().contains("ECCLESIA_PERMISSION_CACHE"));

        set_env("ECCLESIA_ADMIN_ROLE", "   ");
        let err = AccessConfig::from_env().expect_err("blank role");
        clear_env();
        assert!(err.to_string().contains("ECCLESIA_ADMIN_ROLE"));
    }

    #[test]
    #[serial]
    fn yaml_overrides_env() {
        clear_env();
        set_env("ECCLESIA_PERMISSION_CACHE", "false");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("access.yaml");
        let mut file = fs::File::create(&path).expect("create");
        writeln!(file, "admin_role: superintendent\ncache_enabled: true").expect("write");
        set_env("ECCLESIA_ACCESS_CONFIG", path.to_str().expect("utf8 path"));

        let config = AccessConfig::from_env_or_yaml().expect("config");
        clear_env();
        assert_eq!(config.admin_role, Role::new("superintendent"));
        assert!(config.cache_enabled);
        assert!(config.seed_default_roles);
    }

    #[test]
    #[serial]
    fn missing_yaml_file_is_an_error() {
        clear_env();
        set_env("ECCLESIA_ACCESS_CONFIG", "/nonexistent/ecclesia-access.yaml");
        let err = AccessConfig::from_env_or_yaml().expect_err("missing file");
        clear_env();
        assert!(err.to_string().contains("ECCLESIA_ACCESS_CONFIG"));
    }

    #[test]
    fn yaml_rejects_unknown_fields() {
        let mut config = AccessConfig::default();
        assert!(config.apply_yaml("cache_ttl: 30").is_err());
    }
}
