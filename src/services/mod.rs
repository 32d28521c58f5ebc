pub mod password;
pub mod token;

pub use password::{HashError, PasswordHasher};
pub use token::{Claims, TokenService, TOKEN_TTL};
