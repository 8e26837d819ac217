use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use gateway_engine::{DataApi, ProfileApi, SqliteDatabase};

use crate::{
    auth::{IdentityAuthority, JwtAuthority},
    config::ServerConfig,
    errors::ServerError,
    middleware::{AuthMiddlewareFactory, OriginGuardFactory, OriginPolicy},
    routes::{health, index, not_found, ListDataRoute, ProtectedRoute, SubmitDataRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let authority = JwtAuthority::new(&config.auth);
    let srv = create_server_instance(config, db, authority)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<V>(
    config: ServerConfig,
    db: SqliteDatabase,
    authority: V,
) -> Result<Server, ServerError>
where
    V: IdentityAuthority + Clone + Send + 'static,
{
    let srv = HttpServer::new(move || {
        let profile_api = ProfileApi::new(db.clone());
        let data_api = DataApi::new(db.clone());
        let policy = OriginPolicy::new(config.allowed_origins.clone());
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .wrap(AuthMiddlewareFactory::new(authority.clone()))
            .service(ProtectedRoute::<SqliteDatabase>::new())
            .service(SubmitDataRoute::<SqliteDatabase>::new())
            .service(ListDataRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(OriginGuardFactory::new(policy, config.origin_checks))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sdg::access_log"))
            .app_data(json_payload_config())
            .app_data(web::Data::new(profile_api))
            .app_data(web::Data::new(data_api))
            .service(index)
            // Registered before the /api scope so the health check stays outside the auth middleware
            .service(health)
            .service(auth_scope)
            .default_service(web::route().to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// A body that cannot be deserialized at all must still come back in the standard `{error, message}`
/// envelope, rather than actix's default plain-text payload error.
pub fn json_payload_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _| ServerError::BadRequest(format!("Invalid JSON body. {err}")).into())
}
