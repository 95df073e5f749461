pub mod session;

pub use session::{MeResponse, SessionResponse};
