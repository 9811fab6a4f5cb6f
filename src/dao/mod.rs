//! Access to the generative backend.

pub mod generation;
pub mod question_source;
