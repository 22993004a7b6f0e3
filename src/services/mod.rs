pub mod image;
pub mod tokens;

pub use image::ImageService;
pub use tokens::{Claims, TokenError, TokenKind, TokenPair, TokenService};
