//! ATS-readable projection of the portfolio.
//!
//! - [`extract`]: skills, metrics, achievements and samples from a record
//! - [`document`]: one project as semantic HTML plus a `CreativeWork` node
//! - [`batch`]: priority-ordered set of projects and the `@graph`
//! - [`inject`]: write the result into the target page

pub mod batch;
pub mod document;
pub mod extract;
pub mod inject;

pub use batch::AtsBatch;
pub use inject::inject_file;
