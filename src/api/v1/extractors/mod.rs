/*!
 * Authentication context extractor
 *
 * Public API:
 * - CurrentUser
 */
mod current_user;

pub use current_user::CurrentUser;
