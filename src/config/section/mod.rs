//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module  | TOML Section | Purpose                                 |
//! |---------|--------------|-----------------------------------------|
//! | `site`  | `[site]`     | Owner metadata, canonical URL           |
//! | `build` | `[build]`    | Index path, output, stylesheets, sitemap|
//! | `ats`   | `[ats]`      | ATS injection target and projects       |

mod ats;
mod build;
mod site;

pub use ats::{AtsProject, AtsSectionConfig};
pub use build::BuildSectionConfig;
pub use site::SiteSectionConfig;
