/// Factory: build the authentication filter from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ConfigError, TokenSource};
use crate::security::{
    BearerHeaderExtractor, ChainExtractor, CookieExtractor, CredentialExtractor, JwtAuthFilter,
    JwtBackend, QueryExtractor,
};
use crate::services::{AccountDirectory, AccountUser, AuditHandler};

pub fn build_auth_filter(
    config: &Config,
    directory: AccountDirectory,
) -> Result<Arc<JwtAuthFilter<AccountUser>>, ConfigError> {
    let backend = JwtBackend::<AccountUser>::new(&config.filter, Arc::new(directory))?
        .with_loader_timeout(config.loader_timeout);

    let filter = JwtAuthFilter::<AccountUser>::builder()
        .settings(config.filter.clone())
        .extractor(extractor_for(&config.token_source))
        .backend(backend)
        .success_handler(AuditHandler)
        .failure_handler(AuditHandler)
        .build()?;

    Ok(Arc::new(filter))
}

fn extractor_for(source: &TokenSource) -> Box<dyn CredentialExtractor> {
    match source {
        TokenSource::Header => Box::new(BearerHeaderExtractor),
        TokenSource::Cookie(name) => Box::new(CookieExtractor::new(name.clone())),
        TokenSource::Query(param) => Box::new(QueryExtractor::new(param.clone())),
        TokenSource::Any { cookie, query } => Box::new(
            ChainExtractor::new()
                .with(BearerHeaderExtractor)
                .with(CookieExtractor::new(cookie.clone()))
                .with(QueryExtractor::new(query.clone())),
        ),
    }
}
