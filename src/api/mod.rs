// src/api/mod.rs

pub mod types;
pub mod username;
pub mod email;
pub mod domain;
pub mod ip;

pub use types::*;
pub use username::lookup_username;
pub use email::{gravatar_url, lookup_email};
pub use domain::lookup_domain;
pub use ip::{curate_geolocation, lookup_ip};
