//! TTY detection.
//!
//! Log rendering decisions key off stderr, since stdout carries only the
//! fetched content and is commonly piped.

use is_terminal::IsTerminal;

/// Detect whether stderr is connected to an interactive terminal.
#[must_use]
pub fn is_stderr_interactive() -> bool {
    std::io::stderr().is_terminal()
}
