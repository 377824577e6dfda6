//! Bearer token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenType};
pub use decoder::{JwtDecoder, TokenVerifier, peek_subject};
pub use encoder::{IssuedToken, JwtEncoder};
