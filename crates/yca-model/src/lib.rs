//! Domain types shared by every layer of the comments analyzer.
//!
//! Nothing in this crate performs I/O: it describes tasks, their lifecycle,
//! the analysis results attached to them and the video references accepted
//! from callers.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;

mod video;
pub use video::VideoRef;
