//! Page template splicing.
//!
//! The dashboard page is a hand-maintained HTML file. Each run replaces only
//! the content between paired sentinel markers:
//!
//! ```text
//! <!-- START MEDIA -->
//! ...replaced every run...
//! <!-- END MEDIA -->
//! ```
//!
//! Everything outside a marker pair is preserved byte for byte, so manual
//! edits to the page shell survive every run. A missing or malformed pair
//! makes that one splice a no-op; it never corrupts the file and never
//! aborts the run.

use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Replace the content between `<!-- START {name} -->` and
/// `<!-- END {name} -->` with `fragment`.
///
/// The end marker is only searched for after the start marker, so a stray
/// end marker earlier in the file cannot produce a backwards span. When the
/// pair cannot be located the template is returned unchanged.
pub fn splice(template: &str, name: &str, fragment: &str) -> String {
    let start_marker = format!("<!-- START {name} -->");
    let end_marker = format!("<!-- END {name} -->");

    let Some(start) = template.find(&start_marker) else {
        warn!(marker = name, "start marker not found, section left untouched");
        return template.to_string();
    };
    let content_start = start + start_marker.len();

    let Some(end_offset) = template[content_start..].find(&end_marker) else {
        warn!(marker = name, "end marker not found, section left untouched");
        return template.to_string();
    };
    let content_end = content_start + end_offset;

    let body = fragment.trim_matches('\n');
    let mut out = String::with_capacity(template.len() + body.len());
    out.push_str(&template[..content_start]);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str(&template[content_end..]);
    out
}

/// Apply every named fragment to the template in order.
pub fn apply_fragments(template: &str, fragments: &[(&'static str, String)]) -> String {
    fragments
        .iter()
        .fold(template.to_string(), |page, (name, fragment)| {
            splice(&page, name, fragment)
        })
}

/// Read the page template. Failure here is fatal to the run: without the
/// template there is nothing to splice into.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn read_page(path: &str) -> Result<String, Box<dyn Error>> {
    let template = fs::read_to_string(path).await?;
    info!(bytes = template.len(), "Read page template");
    Ok(template)
}

/// Write the spliced page back in place.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn write_page(path: &str, contents: &str) -> Result<(), Box<dyn Error>> {
    fs::write(path, contents).await?;
    info!(bytes = contents.len(), "Wrote page");
    Ok(())
}
