use staffdesk_domain::credentials::PasswordConvention;

/// Directory service configuration loaded from environment variables.
#[derive(Debug)]
pub struct DirectoryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3142). Env var: `DIRECTORY_PORT`.
    pub directory_port: u16,
    /// HS256 secret for session tokens. Env var: `DIRECTORY_JWT_SECRET`.
    pub jwt_secret: String,
    /// Org domain for derived login emails (default "lazysquad.com").
    /// Env var: `DIRECTORY_EMAIL_DOMAIN`.
    pub email_domain: String,
    /// Password derivation convention, `code` (default) or `name-code`.
    /// Env var: `DIRECTORY_PASSWORD_CONVENTION`.
    pub password_convention: PasswordConvention,
}

impl DirectoryConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            directory_port: std::env::var("DIRECTORY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3142),
            jwt_secret: std::env::var("DIRECTORY_JWT_SECRET").expect("DIRECTORY_JWT_SECRET"),
            email_domain: std::env::var("DIRECTORY_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "lazysquad.com".to_owned()),
            password_convention: std::env::var("DIRECTORY_PASSWORD_CONVENTION")
                .ok()
                .and_then(|v| PasswordConvention::from_kebab_case(&v))
                .unwrap_or_default(),
        }
    }
}
