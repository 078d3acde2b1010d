pub mod core;
pub mod service;


pub use self::core::{Authenticator, Resolution};
pub use self::service::{
    AuthenticationListener, CredentialVerifier, InMemoryUserDetailsService, TracingListener, UserDetailsService,
};
