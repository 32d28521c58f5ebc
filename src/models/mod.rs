pub mod actor;
pub mod movie;
pub mod schema;
pub mod user;

pub use actor::{Actor, ActorResponse, NewActor};
pub use movie::{Movie, MovieResponse, NewMovie};
pub use schema::{Dump, Schema, ValidationError};
pub use user::{NewUser, SigninRequest, SignupRequest, TokenResponse, User, UserResponse};
