/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Most game sessions kept in memory at once.
    pub max_games: usize,
}

const DEFAULT_PORT: u16 = 8083;
const DEFAULT_MAX_GAMES: usize = 1000;

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            max_games: lookup("CHESS_MAX_GAMES")
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_MAX_GAMES),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            max_games: DEFAULT_MAX_GAMES,
        }
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
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8083);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_games, 1000);
        assert_eq!(config.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn values_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("CHESS_MAX_GAMES", "5"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.max_games, 5);
    }

    #[test]
    fn bad_values_fall_back() {
        let config =
            AppConfig::from_lookup(lookup(&[("PORT", "http"), ("CHESS_MAX_GAMES", "0")]));
        assert_eq!(config.port, 8083);
        assert_eq!(config.max_games, 1000);

        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8083);
    }
}
