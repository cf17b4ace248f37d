mod error;
mod extract;
pub mod handlers;
mod router;

pub use error::ApiError;
pub use extract::RequireUser;
pub use router::build_router;
