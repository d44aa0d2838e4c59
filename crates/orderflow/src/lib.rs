#![doc = include_str!("../README.md")]

mod error;
mod models;
mod pipeline;
mod store;

pub use crate::error::*;
pub use crate::models::*;
pub use crate::pipeline::*;
pub use crate::store::*;
