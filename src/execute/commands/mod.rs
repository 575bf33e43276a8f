//! Built-in command sets, installed by [`CommandRegistry::with_defaults`],
//! [`CommandRegistry::rendering`] and [`CommandRegistry::config_only`].
//!
//! [`CommandRegistry::with_defaults`]: super::CommandRegistry::with_defaults
//! [`CommandRegistry::rendering`]: super::CommandRegistry::rendering
//! [`CommandRegistry::config_only`]: super::CommandRegistry::config_only

pub mod config;
pub mod core;
pub mod markup;
