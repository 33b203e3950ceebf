//! Generate an OpenSSH client configuration from EC2 instances selected by tag.
//!
//! Public instances are written with their public address; every other
//! instance gets a `ProxyCommand` through the public one.

pub mod aws;
pub mod error;
pub mod inventory;
pub mod render;
pub mod settings;

pub use error::{Error, Result};
