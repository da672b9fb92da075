//! Page rendering for stdout.
//!
//! The layout is fixed so that output can be consumed by scripts:
//!
//! ```text
//! > User-Agent: scraper/0.3.0        (request headers, with -i/-I)
//!
//! < Content-Type: text/plain         (response headers, with -i/-I)
//!
//! hello                              (trimmed body, never for HEAD)
//! ```

use std::io::{self, Write};

use scraper_core::{Headers, Page};

/// What to render for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Print request and response header blocks.
    pub include_headers: bool,
    /// The effective method was HEAD: never print the body.
    pub is_head: bool,
}

/// Render `page` to `out`.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_page<W: Write>(out: &mut W, page: &Page, opts: RenderOptions) -> io::Result<()> {
    if opts.include_headers {
        write_header_block(out, '>', &page.request.header)?;
        write_header_block(out, '<', &page.response.header)?;
    }

    // Bodies are arbitrary bytes; only surrounding ASCII whitespace is cut.
    let body = page.response.body.trim_ascii();
    if !body.is_empty() && !opts.is_head {
        out.write_all(body)?;
        writeln!(out)?;
    }
    Ok(())
}

/// One `{prefix} Name: v1, v2` line per header, then a blank line if any.
fn write_header_block<W: Write>(out: &mut W, prefix: char, headers: &Headers) -> io::Result<()> {
    for (name, values) in headers {
        writeln!(out, "{prefix} {name}: {}", values.join(", "))?;
    }
    if !headers.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}
