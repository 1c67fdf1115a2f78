use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub food_dataset_path: String,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let food_dataset_path = std::env::var("FOOD_DATASET_PATH")
            .unwrap_or_else(|_| "data/comprehensive_food_dataset.csv".into());
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: match std::env::var("APP_PORT") {
                Ok(v) => v
                    .parse::<u16>()
                    .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
                Err(_) => 8080,
            },
        };
        Ok(Self {
            food_dataset_path,
            server,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_joins_host_and_port() {
        let config = AppConfig {
            food_dataset_path: "foods.csv".into(),
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:3000");
    }
}
