use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use argon2::Params;

use reelgate_api::token::DEFAULT_TOKEN_TTL_SECS;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

/// Server settings, read once at startup from `REELGATE_*` variables.
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub videos_dir: PathBuf,
    pub static_dir: PathBuf,
    pub token_ttl_secs: i64,
    pub argon2: Params,
    pub expose_errors: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("videos_dir", &self.videos_dir)
            .field("static_dir", &self.static_dir)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("argon2", &self.argon2)
            .field("expose_errors", &self.expose_errors)
            .finish()
    }
}

impl Config {
    pub fn from_env()-> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = get("REELGATE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("REELGATE_JWT_SECRET is unset or still a placeholder");
        }

        let token_ttl_secs = parse_or(&get, "REELGATE_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            bail!("REELGATE_TOKEN_TTL_SECS must be positive");
        }

        let defaults = Params::default();
        let argon2 = Params::new(
            parse_or(&get, "REELGATE_ARGON2_M_COST", defaults.m_cost())?,
            parse_or(&get, "REELGATE_ARGON2_T_COST", defaults.t_cost())?,
            parse_or(&get, "REELGATE_ARGON2_P_COST", defaults.p_cost())?,
            None,
        )
        .map_err(|e| anyhow!("invalid argon2 cost parameters: {}", e))?;

        Ok(Self {
            jwt_secret,
            db_path: get("REELGATE_DB_PATH")
                .unwrap_or_else(|| "reelgate.db".into())
                .into(),
            host: get("REELGATE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "REELGATE_PORT", 8080)?,
            videos_dir: get("REELGATE_VIDEOS_DIR")
                .unwrap_or_else(|| "./videos".into())
                .into(),
            static_dir: get("REELGATE_STATIC_DIR")
                .unwrap_or_else(|| "./static".into())
                .into(),
            token_ttl_secs,
            argon2,
            expose_errors: parse_or(&get, "REELGATE_EXPOSE_ERRORS", false)?,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("REELGATE_JWT_SECRET", "s3cr3t-value")])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.db_path, PathBuf::from("reelgate.db"));
        assert_eq!(config.videos_dir, PathBuf::from("./videos"));
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.argon2.m_cost(), Params::default().m_cost());
        assert!(!config.expose_errors);
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("REELGATE_JWT_SECRET", "")])).is_err());
    }

    #[test]
    fn placeholder_secret_is_fatal() {
        let err = Config::from_lookup(lookup(&[("REELGATE_JWT_SECRET", "dev-secret-change-me")]))
            .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("REELGATE_JWT_SECRET", "s3cr3t-value"),
            ("REELGATE_PORT", "9000"),
            ("REELGATE_VIDEOS_DIR", "/srv/videos"),
            ("REELGATE_TOKEN_TTL_SECS", "60"),
            ("REELGATE_ARGON2_M_COST", "4096"),
            ("REELGATE_ARGON2_T_COST", "3"),
            ("REELGATE_EXPOSE_ERRORS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.videos_dir, PathBuf::from("/srv/videos"));
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.argon2.m_cost(), 4096);
        assert_eq!(config.argon2.t_cost(), 3);
        assert!(config.expose_errors);
    }

    #[test]
    fn unparseable_values_are_fatal() {
        let err = Config::from_lookup(lookup(&[
            ("REELGATE_JWT_SECRET", "s3cr3t-value"),
            ("REELGATE_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("REELGATE_PORT"));
    }

    #[test]
    fn impossible_argon2_costs_are_fatal() {
        assert!(Config::from_lookup(lookup(&[
            ("REELGATE_JWT_SECRET", "s3cr3t-value"),
            ("REELGATE_ARGON2_M_COST", "1"),
        ]))
        .is_err());
    }

    #[test]
    fn non_positive_ttl_is_fatal() {
        assert!(Config::from_lookup(lookup(&[
            ("REELGATE_JWT_SECRET", "s3cr3t-value"),
            ("REELGATE_TOKEN_TTL_SECS", "0"),
        ]))
        .is_err());
    }
}
