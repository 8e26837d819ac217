//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every handler below runs *after* the origin guard and (for the protected scope) the authentication
//! middleware, so a [`Principal`] argument is always the verified caller. Handlers scope every store
//! operation by `Principal::uid` and never accept a caller-supplied identifier as the scoping key.
use actix_web::{error::ResponseError, get, web, HttpResponse, Responder};
use gateway_engine::{DataApi, DataStore, ProfileApi, UserStore};
use log::*;
use serde_json::json;

use crate::{
    auth::Principal,
    data_objects::{DataListResponse, HealthResponse, PrincipalSummary, ProtectedResponse, SubmitDataRequest,
        SubmitDataResponse},
    errors::ServerError,
};

// Actix cannot handle generics in attribute-macro handlers, so protected routes are registered manually
// using the `route!` macro.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/api/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(HealthResponse::healthy())
}

// ----------------------------------------------   Index  -----------------------------------------------------
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "🚀 Scoped Data Gateway API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "protected": "/api/protected (requires auth)",
            "data": "/api/data (requires auth)"
        }
    }))
}

/// Fallback for unmatched paths. The same JSON envelope as every other error, and no hint about which
/// routes do exist.
pub async fn not_found() -> HttpResponse {
    ServerError::NotFound.error_response()
}

// ----------------------------------------------   Protected  -------------------------------------------------
route!(protected => Get "/protected" impl UserStore);
/// Fetch-or-create the caller's profile.
///
/// Reads the [`gateway_engine::db_types::UserRecord`] keyed by the verified principal id; on first access
/// a record is created from the principal's email and the current timestamp. Apart from that first-call
/// creation the endpoint is idempotent.
pub async fn protected<A>(
    principal: Principal,
    api: web::Data<ProfileApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: UserStore,
{
    debug!("💻️ GET protected for {}", principal.uid);
    let record = api.fetch_or_create_user(&principal.uid, principal.email.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ProtectedResponse {
        message: "This is a protected endpoint".to_string(),
        user: PrincipalSummary::from(&principal),
        data: record,
    }))
}

// ----------------------------------------------   Data  ------------------------------------------------------
route!(submit_data => Post "/data" impl DataStore);
/// Persist a caller-submitted payload, stamped with the principal id and the current timestamp. An absent
/// or empty payload is a 400 and persists nothing.
pub async fn submit_data<A>(
    principal: Principal,
    body: web::Json<SubmitDataRequest>,
    api: web::Data<DataApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: DataStore,
{
    debug!("💻️ POST data for {}", principal.uid);
    let payload = body
        .into_inner()
        .into_payload()
        .ok_or_else(|| ServerError::BadRequest("Data field is required".to_string()))?;
    let id = api.submit(&principal.uid, payload).await?;
    Ok(HttpResponse::Ok().json(SubmitDataResponse { message: "Data saved successfully".to_string(), id }))
}

route!(list_data => Get "/data" impl DataStore);
/// The caller's newest records, capped at [`gateway_engine::MAX_PAGE_SIZE`].
pub async fn list_data<A>(principal: Principal, api: web::Data<DataApi<A>>) -> Result<HttpResponse, ServerError>
where
    A: DataStore,
{
    debug!("💻️ GET data for {}", principal.uid);
    let data = api.latest_records(&principal.uid).await?;
    Ok(HttpResponse::Ok().json(DataListResponse {
        message: "Data retrieved successfully".to_string(),
        count: data.len(),
        data,
    }))
}
