use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub rate_limit_burst: u32,
    pub smtp: Option<SmtpConfig>,
}

/// SMTP settings for the two-factor code mailer.
/// When absent the service falls back to a log-only mailer.
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rate_limit_burst = match env::var("RATE_LIMIT_BURST") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| "RATE_LIMIT_BURST must be a positive integer".to_string())?,
            Err(_) => 100,
        };

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) => {
                let port = env::var("SMTP_PORT")
                    .ok()
                    .map(|p| {
                        p.parse()
                            .map_err(|_| "SMTP_PORT must be a port number".to_string())
                    })
                    .transpose()?
                    .unwrap_or(587);

                let username = env::var("SMTP_USER")
                    .map_err(|_| "SMTP_USER must be set when SMTP_HOST is set".to_string())?;

                let password = env::var("SMTP_PASS")
                    .map_err(|_| "SMTP_PASS must be set when SMTP_HOST is set".to_string())?;

                let from = env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

                Some(SmtpConfig {
                    host,
                    port,
                    username,
                    password,
                    from,
                })
            }
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            rate_limit_burst,
            smtp,
        })
    }
}
