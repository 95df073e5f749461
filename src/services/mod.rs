/*
 * Responsibility
 * - Collaborators plugged into the authentication filter by the server
 *   (principal directory, audit hooks)
 */
pub mod accounts;
pub mod audit;
pub mod factory;

pub use accounts::{AccountDirectory, AccountUser};
pub use audit::AuditHandler;
pub use factory::build_auth_filter;
