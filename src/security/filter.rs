//! Bearer authentication filter (pipeline controller).
//!
//! For each request:
//! 1. Skips requests this filter already processed
//! 2. Extracts the credential; none (or an unusable carrier) => anonymous pass-through
//! 3. Asks the backend to verify it
//! 4. Finalizes the `SecurityContext`, publishes the principal on success
//! 5. Runs the matching outcome handler
//! 6. Calls the continuation, always exactly once

use std::{future::Future, marker::PhantomData, sync::Arc};

use axum::{
    body::Body,
    http::{HeaderMap, Request, request::Parts},
    response::Response,
};
use tracing::{debug, error, info, trace};

use crate::config::ConfigError;
use crate::security::{
    AuthenticatedPrincipal, AuthenticationBackend, AuthenticationFailureHandler,
    AuthenticationSuccessHandler, BearerHeaderExtractor, CredentialExtractor, FilterSettings,
    PreAuthenticationRequest, Principal, SecurityContext,
};

/// Marks a request as already processed by a filter for principal type `U`.
struct AlreadyFiltered<U>(PhantomData<fn() -> U>);

impl<U> Clone for AlreadyFiltered<U> {
    fn clone(&self) -> Self {
        Self(PhantomData)
    }
}

pub struct JwtAuthFilter<U: Principal> {
    settings: FilterSettings,
    extractor: Arc<dyn CredentialExtractor>,
    backend: Arc<dyn AuthenticationBackend<U>>,
    success_handler: Option<Arc<dyn AuthenticationSuccessHandler<U>>>,
    failure_handler: Option<Arc<dyn AuthenticationFailureHandler>>,
}

impl<U: Principal> JwtAuthFilter<U> {
    pub fn builder() -> JwtAuthFilterBuilder<U> {
        JwtAuthFilterBuilder::new()
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Runs the pipeline for one request, then hands it to `continuation`.
    ///
    /// Authentication failures never surface here: the request always proceeds,
    /// carrying a (possibly empty) `SecurityContext<U>` in its extensions.
    /// Headers written by outcome handlers are merged into the final response.
    pub async fn process<C, Fut>(&self, request: Request<Body>, continuation: C) -> Response
    where
        C: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Response>,
    {
        if request.extensions().get::<AlreadyFiltered<U>>().is_some() {
            trace!(
                service = %self.settings.service_name(),
                "authentication already performed for this request"
            );
            return continuation(request).await;
        }

        let (mut parts, body) = request.into_parts();
        parts.extensions.insert(AlreadyFiltered::<U>(PhantomData));
        // Only this filter may publish a principal or a context.
        parts.extensions.remove::<AuthenticatedPrincipal<U>>();
        parts.extensions.insert(SecurityContext::<U>::new());

        let mut response_headers = HeaderMap::new();
        self.authenticate(&mut parts, &mut response_headers).await;

        let mut response = continuation(Request::from_parts(parts, body)).await;
        response.headers_mut().extend(response_headers);
        response
    }

    /// Leaves the final `SecurityContext<U>` in `parts.extensions` before any
    /// outcome handler runs, so handlers and the continuation observe the same state.
    async fn authenticate(&self, parts: &mut Parts, response_headers: &mut HeaderMap) {
        let credential = match self.extractor.extract(parts) {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                trace!("no credential presented, continuing anonymously");
                return;
            }
            Err(err) => {
                debug!(error = %err, "unusable credential carrier, continuing anonymously");
                return;
            }
        };

        let service = self.settings.service_name();
        let backend = self.backend.name();

        match self
            .backend
            .authenticate(PreAuthenticationRequest::new(credential))
            .await
        {
            Ok(identity) => {
                debug!(
                    service,
                    backend,
                    subject = ?identity.id(),
                    "authentication success, updating security context"
                );
                let principal = identity.principal().clone();
                let mut context = SecurityContext::new();
                context.set(identity);
                parts.extensions.insert(context.clone());
                parts.extensions.insert(AuthenticatedPrincipal(principal));

                if let (Some(handler), Some(identity)) = (&self.success_handler, context.current()) {
                    handler
                        .on_authentication_success(parts, response_headers, identity)
                        .await;
                }
            }
            Err(failure) => {
                if failure.is_backend_unavailable() {
                    error!(
                        service,
                        backend,
                        error = %failure,
                        "an internal error occurred while trying to authenticate the request"
                    );
                } else {
                    debug!(service, backend, error = %failure, "authentication request failed");
                }

                parts.extensions.insert(SecurityContext::<U>::new());
                parts.extensions.remove::<AuthenticatedPrincipal<U>>();

                if let Some(handler) = &self.failure_handler {
                    handler
                        .on_authentication_failure(parts, response_headers, &failure)
                        .await;
                }
            }
        }
    }
}

/// Collects the filter's collaborators and validates them once at startup.
pub struct JwtAuthFilterBuilder<U: Principal> {
    settings: Option<FilterSettings>,
    extractor: Option<Arc<dyn CredentialExtractor>>,
    backend: Option<Arc<dyn AuthenticationBackend<U>>>,
    success_handler: Option<Arc<dyn AuthenticationSuccessHandler<U>>>,
    failure_handler: Option<Arc<dyn AuthenticationFailureHandler>>,
}

impl<U: Principal> JwtAuthFilterBuilder<U> {
    pub fn new() -> Self {
        Self {
            settings: None,
            extractor: None,
            backend: None,
            success_handler: None,
            failure_handler: None,
        }
    }

    pub fn settings(mut self, settings: FilterSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Defaults to [`BearerHeaderExtractor`].
    pub fn extractor(mut self, extractor: impl CredentialExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn backend(mut self, backend: impl AuthenticationBackend<U> + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    pub fn success_handler(mut self, handler: impl AuthenticationSuccessHandler<U> + 'static) -> Self {
        self.success_handler = Some(Arc::new(handler));
        self
    }

    pub fn failure_handler(mut self, handler: impl AuthenticationFailureHandler + 'static) -> Self {
        self.failure_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<JwtAuthFilter<U>, ConfigError> {
        let backend = self
            .backend
            .ok_or(ConfigError::Missing("authentication_backend"))?;
        let settings = self.settings.ok_or(ConfigError::Missing("service_name"))?;
        settings.validate()?;

        info!(
            service = %settings.service_name(),
            backend = backend.name(),
            "authentication filter initialized"
        );

        Ok(JwtAuthFilter {
            settings,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(BearerHeaderExtractor) as Arc<dyn CredentialExtractor>),
            backend,
            success_handler: self.success_handler,
            failure_handler: self.failure_handler,
        })
    }
}

impl<U: Principal> Default for JwtAuthFilterBuilder<U> {
    fn default() -> Self {
        Self::new()
    }
}
