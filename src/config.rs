use std::env;

pub struct Config {
    pub store_url: String,
    pub store_database: String,
    pub token_secret: String,
    pub token_ttl_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            store_url: env::var("STORE_URL").unwrap_or_else(|_| "memory://".to_string()),
            store_database: env::var("STORE_DATABASE").unwrap_or_else(|_| "taskhive".to_string()),
            token_secret: env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set"),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("TOKEN_TTL_MINUTES must be a number"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
