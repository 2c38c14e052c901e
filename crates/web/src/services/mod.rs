//! Services backed by external resources.
//!
//! # Services
//!
//! - `auth` - Login against the static users resource
//! - `weather` - Current conditions for the home page widget

pub mod auth;
pub mod weather;

pub use auth::{AuthError, AuthService, UsersDocument};
pub use weather::{WeatherClient, WeatherError, WeatherReport};
