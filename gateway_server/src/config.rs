use std::{env, io::Write};

use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sdg_common::{parse_boolean_flag, Secret};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_SDG_HOST: &str = "127.0.0.1";
const DEFAULT_SDG_PORT: u16 = 8080;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// The origins browser clients may call from. Loaded once at startup; there is no runtime
    /// reconfiguration.
    pub allowed_origins: Vec<String>,
    /// If false, the origin allow-list is not enforced and every origin is let through. **DANGER**
    pub origin_checks: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SDG_HOST.to_string(),
            port: DEFAULT_SDG_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGINS.to_string()],
            origin_checks: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SDG_HOST").ok().unwrap_or_else(|| DEFAULT_SDG_HOST.into());
        let port = env::var("SDG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SDG_PORT. {e} Using the default, {DEFAULT_SDG_PORT}, instead."
                    );
                    DEFAULT_SDG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SDG_PORT);
        let database_url = env::var("SDG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SDG_DATABASE_URL is not set. Please set it to the URL for the gateway database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let allowed_origins = configure_allowed_origins();
        let origin_checks = parse_boolean_flag(env::var("SDG_ORIGIN_CHECKS").ok(), true);
        if !origin_checks {
            warn!("🚨️ Origin checks are disabled. Any origin can call this server. Do NOT run production like this.");
        }
        Self { host, port, database_url, auth, allowed_origins, origin_checks }
    }
}

fn configure_allowed_origins() -> Vec<String> {
    let origins = match env::var("SDG_ALLOWED_ORIGINS") {
        Ok(s) => {
            s.split(',').map(str::trim).filter(|o| !o.is_empty()).map(String::from).collect::<Vec<String>>()
        },
        Err(_) => {
            info!("🪛️ SDG_ALLOWED_ORIGINS is not set. Using the default, {DEFAULT_ALLOWED_ORIGINS}.");
            vec![DEFAULT_ALLOWED_ORIGINS.to_string()]
        },
    };
    if origins.is_empty() {
        warn!(
            "🚨️ The origin allow-list is empty. The server will run, but will deny every browser request. Set \
             SDG_ALLOWED_ORIGINS to a comma-separated list of origins."
        );
    } else {
        info!("🪛️ Allowed origins: {}", origins.join(", "));
    }
    origins
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to verify id tokens issued by the identity authority.
    pub jwt_secret: Secret<String>,
    /// If set, the `iss` claim of every id token must match this value exactly.
    pub issuer: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The token verification secret has not been set. I'm using a random value for this session. \
             Every credential will fail verification once the server restarts. DO NOT operate on production like \
             this. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The token verification secret for this session was written to {}. If this is a \
                         production instance, you are doing it wrong! Set the SDG_JWT_SECRET environment variable \
                         instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the token verification secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the token verification secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), issuer: None }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("SDG_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [SDG_JWT_SECRET]")))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ServerError::ConfigurationError(format!(
                "SDG_JWT_SECRET must be at least {MIN_SECRET_LEN} characters long. Generate a longer secret and \
                 share it with the identity authority."
            )));
        }
        let issuer = env::var("SDG_JWT_ISSUER").ok().filter(|s| !s.is_empty());
        Ok(Self { jwt_secret: Secret::new(secret), issuer })
    }
}
