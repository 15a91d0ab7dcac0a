//! Output generation modules for the dashboard page and the JSON snapshot.
//!
//! This module contains submodules responsible for turning a ranked result
//! into bytes on disk:
//!
//! # Submodules
//!
//! - [`html`]: Renders ranked articles into HTML fragments, one per marker
//! - [`page`]: Splices fragments into the page template between marker pairs
//! - [`json`]: Writes the ranked result as a JSON snapshot
//!
//! # Page Structure
//!
//! The page template owns all layout and styling; the pipeline only replaces
//! the content between marker pairs:
//!
//! ```text
//! <!-- START BREAKING --> ... <!-- END BREAKING -->
//! <!-- START MEDIA -->    ... <!-- END MEDIA -->
//! <!-- START GOV -->      ... <!-- END GOV -->
//! <!-- START INTL -->     ... <!-- END INTL -->
//! ```

pub mod html;
pub mod json;
pub mod page;
