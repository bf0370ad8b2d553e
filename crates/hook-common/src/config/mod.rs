//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    MailConfig, OAuthConfig, OAuthProviderConfig, PasswordConfig, RateLimitConfig, ServerConfig,
    SweepConfig,
};
