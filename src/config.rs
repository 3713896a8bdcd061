use std::collections::HashSet;

use compact_str::CompactStr;
use itertools::Itertools;

const DEFAULT_PURGE_INTERVAL_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub admins: HashSet<CompactStr>,
    /// Uin of the bot account, quotes from anyone else are not notices.
    pub self_id: Option<CompactStr>,
    pub request_ttl: Option<time::Duration>,
    pub purge_interval: std::time::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admins = lookup("admins")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|admin| !admin.is_empty())
            .map(CompactStr::new)
            .collect::<HashSet<_>>();

        let self_id = lookup("self_id")
            .or_else(|| lookup("number"))
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .map(CompactStr::new);

        let request_ttl = match seconds(&lookup, "request_ttl")?.filter(|secs| *secs > 0) {
            Some(secs) => {
                let secs = i64::try_from(secs).map_err(|_| ConfigError::InvalidSeconds {
                    key: "request_ttl",
                    value: secs.to_string(),
                })?;
                Some(time::Duration::seconds(secs))
            }
            None => None,
        };

        let purge_interval = std::time::Duration::from_secs(
            seconds(&lookup, "purge_interval")?
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_PURGE_INTERVAL_SECS),
        );

        Ok(Config {
            admins,
            self_id,
            request_ttl,
            purge_interval,
        })
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.contains(&CompactStr::new(user_id))
    }

    pub fn admins_display(&self) -> String {
        self.admins.iter().map(ToString::to_string).sorted().join(",")
    }
}

fn seconds<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidSeconds { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parses_admin_list() {
        let config = parse(&[("admins", " 111, 222 ,,333")]).unwrap();
        assert_eq!(config.admins.len(), 3);
        assert!(config.is_admin("111"));
        assert!(config.is_admin("222"));
        assert!(!config.is_admin("444"));
        assert_eq!(config.admins_display(), "111,222,333");
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert!(config.admins.is_empty());
        assert!(config.self_id.is_none());
        assert!(config.request_ttl.is_none());
        assert_eq!(config.purge_interval.as_secs(), DEFAULT_PURGE_INTERVAL_SECS);
    }

    #[test]
    fn self_id_falls_back_to_login_number() {
        let config = parse(&[("number", "10000")]).unwrap();
        assert_eq!(config.self_id.unwrap(), "10000");

        let config = parse(&[("number", "10000"), ("self_id", "20000")]).unwrap();
        assert_eq!(config.self_id.unwrap(), "20000");
    }

    #[test]
    fn request_ttl_in_seconds() {
        let config = parse(&[("request_ttl", "3600")]).unwrap();
        assert_eq!(config.request_ttl, Some(time::Duration::hours(1)));

        let config = parse(&[("request_ttl", "0")]).unwrap();
        assert!(config.request_ttl.is_none());
    }

    #[test]
    fn request_ttl_out_of_range_is_an_error() {
        let err = parse(&[("request_ttl", "18446744073709551615")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeconds { key: "request_ttl", .. }));

        let config = parse(&[("request_ttl", "9223372036854775807")]).unwrap();
        assert!(config.request_ttl.unwrap().is_positive());
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = parse(&[("purge_interval", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeconds { key: "purge_interval", .. }));
    }
}
