use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub pool_ttl: Duration,
    pub market_ttl: Duration,
    pub token_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_url = env_map
            .get("TUNA_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("TUNA_API_URL".to_string()))?;

        let pool_ttl = parse_secs(&env_map, "POOL_TTL_SECS", 30)?;
        let market_ttl = parse_secs(&env_map, "MARKET_TTL_SECS", 3600)?;
        let token_ttl = parse_secs(&env_map, "TOKEN_TTL_SECS", 86400)?;

        Ok(Config {
            api_url,
            pool_ttl,
            market_ttl,
            token_ttl,
        })
    }
}

fn parse_secs(
    env_map: &HashMap<String, String>,
    key: &str,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    match env_map.get(key) {
        None => Ok(Duration::from_secs(default_secs)),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "must be a valid u64".to_string())
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(
            "TUNA_API_URL".to_string(),
            "https://api.example.invalid".to_string(),
        );
        map
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.pool_ttl, Duration::from_secs(30));
        assert_eq!(config.market_ttl, Duration::from_secs(3600));
        assert_eq!(config.token_ttl, Duration::from_secs(86400));
    }

    #[test]
    fn test_missing_api_url() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "TUNA_API_URL"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_ttl_override() {
        let mut env_map = setup_required_env();
        env_map.insert("POOL_TTL_SECS".to_string(), "5".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.pool_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_ttl() {
        let mut env_map = setup_required_env();
        env_map.insert("MARKET_TTL_SECS".to_string(), "soon".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MARKET_TTL_SECS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
