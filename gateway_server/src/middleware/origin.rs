//! Origin allow-list middleware.
//!
//! This middleware evaluates the `Origin` header of every incoming request against the configured
//! allow-list *before* authentication or routing run. Requests without an origin (curl, mobile apps,
//! server-to-server callers) always pass. Requests with an origin pass only on a case-sensitive exact
//! match; everything else is denied with a 403 that leaks nothing about the routes behind the guard.
//!
//! For allowed browser origins the middleware also reflects the CORS response headers and answers
//! `OPTIONS` preflight requests itself, so no preflight ever reaches the handlers.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header,
        header::{HeaderValue, ORIGIN, VARY},
        Method,
    },
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::errors::ServerError;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// The immutable origin allow-list. Built once from configuration at startup and shared by every
/// pipeline; evaluation is pure.
#[derive(Clone, Debug, Default)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { allowed: origins.into_iter().map(Into::into).collect() }
    }

    /// An absent origin is always allowed (non-browser callers). A present origin is allowed iff it is a
    /// case-sensitive exact member of the configured list.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }
}

pub struct OriginGuardFactory {
    policy: OriginPolicy,
    // If false, then the middleware will not check the origin and always allows the call
    enabled: bool,
}

impl OriginGuardFactory {
    pub fn new(policy: OriginPolicy, enabled: bool) -> Self {
        OriginGuardFactory { policy, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginGuardFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = OriginGuardService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginGuardService {
            policy: self.policy.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct OriginGuardService<S> {
    policy: OriginPolicy,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OriginGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = self.policy.clone();
        let enabled = self.enabled;
        Box::pin(async move {
            let origin = req.headers().get(ORIGIN).cloned();
            if enabled {
                // A non-UTF8 origin can never match the allow-list, so it is denied outright.
                let declared = match &origin {
                    Some(value) => match value.to_str() {
                        Ok(s) => Some(s),
                        Err(_) => {
                            warn!("🌐️ Request carried an unreadable Origin header. Denying access.");
                            return Err(ServerError::OriginNotAllowed.into());
                        },
                    },
                    None => None,
                };
                if !policy.is_allowed(declared) {
                    warn!("🌐️ Origin {} is not in the allow-list. Denying access.", declared.unwrap_or("?"));
                    return Err(ServerError::OriginNotAllowed.into());
                }
            }
            if let Some(origin) = &origin {
                if req.method() == Method::OPTIONS {
                    trace!("🌐️ Answering preflight for {origin:?}");
                    let response = HttpResponse::NoContent()
                        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone()))
                        .insert_header((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"))
                        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
                        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
                        .insert_header((VARY, "Origin"))
                        .finish();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }
            // Errors surfacing from the inner pipeline (e.g. a 401 from the authentication middleware)
            // are rendered here so the CORS headers below land on them too; otherwise a browser client
            // at an allowed origin could never read the error envelope.
            let http_req = req.request().clone();
            let mut res = match service.call(req).await {
                Ok(res) => res.map_into_left_body(),
                Err(err) => {
                    ServiceResponse::new(http_req, HttpResponse::from_error(err)).map_into_right_body()
                },
            };
            if let Some(origin) = origin {
                let headers = res.headers_mut();
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
                headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
                headers.append(VARY, HeaderValue::from_static("Origin"));
            }
            Ok(res)
        })
    }
}
