pub mod prelude;

pub mod crops;
pub mod revoked_tokens;
pub mod users;
