pub use super::crops::Entity as Crops;
pub use super::revoked_tokens::Entity as RevokedTokens;
pub use super::users::Entity as Users;
