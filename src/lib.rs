//! Backend for the Amsterdam stadstuin wish board
//!
//! Merges citizen wishes into a single garden scene description through a
//! hosted chat model, renders that description with a hosted image model, and
//! serves both steps over HTTP. Also ships a small language identification
//! tool (`langid`).

pub mod ai;
pub mod api;
pub mod error;
pub mod langid;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
