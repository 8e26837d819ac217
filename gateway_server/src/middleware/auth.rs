//! Authentication middleware for the gateway.
//!
//! This middleware can be placed on any scope or route. It reads the `Authorization` header, checks the
//! `Bearer` scheme, and hands the credential to the configured [`IdentityAuthority`] for verification.
//! On success the resulting [`crate::auth::Principal`] is attached to the request so handlers can take it as an
//! extractor argument. On failure the pipeline stops with a 401; a header that is absent or carries the
//! wrong scheme is rejected without the authority ever being contacted.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};

use crate::{
    auth::{extract_bearer_token, IdentityAuthority},
    errors::{AuthError, ServerError},
};

pub struct AuthMiddlewareFactory<V> {
    authority: Rc<V>,
}

impl<V: IdentityAuthority> AuthMiddlewareFactory<V> {
    pub fn new(authority: V) -> Self {
        AuthMiddlewareFactory { authority: Rc::new(authority) }
    }
}

impl<S, B, V> Transform<S, ServiceRequest> for AuthMiddlewareFactory<V>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    V: IdentityAuthority + 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AuthMiddlewareService<S, V>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { authority: Rc::clone(&self.authority), service: Rc::new(service) }))
    }
}

pub struct AuthMiddlewareService<S, V> {
    authority: Rc<V>,
    service: Rc<S>,
}

impl<S, B, V> Service<ServiceRequest> for AuthMiddlewareService<S, V>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    V: IdentityAuthority + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authority = Rc::clone(&self.authority);
        Box::pin(async move {
            trace!("🔐️ Checking credentials for request");
            // The raw credential is owned here and dropped as soon as verification finishes; it is never
            // logged and never attached to the request.
            let token = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(AuthError::MalformedCredential)
                .and_then(extract_bearer_token)
                .map(str::to_owned);
            let token = match token {
                Ok(token) => token,
                Err(e) => {
                    debug!("🔐️ Rejecting request before verification: {e}");
                    return Err(ServerError::AuthenticationError(e).into());
                },
            };
            let principal = authority
                .verify_id_token(&token)
                .await
                .map_err(|e| Error::from(ServerError::AuthenticationError(e)))?;
            trace!("🔐️ Credential verified for {}", principal.uid);
            req.extensions_mut().insert(principal);
            service.call(req).await
        })
    }
}
