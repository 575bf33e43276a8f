#![allow(dead_code)]

pub mod diagnostic_helpers;
pub mod project_fixtures;
