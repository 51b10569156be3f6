//! Identity number validation command.
//!
//! # Usage
//!
//! ```bash
//! cc-cli validate 19900101-1234   # prints 199001011234
//! cc-cli validate 1990-01-01      # exits 1 with the format error
//! ```

use std::io::Write;

use civic_checkout_core::{IdentityNumber, IdentityNumberError};

/// Validate `raw` and print its normalized form.
///
/// # Errors
///
/// Returns `IdentityNumberError::Format` if `raw` is not an accepted form.
pub fn run(raw: &str) -> Result<(), Box<dyn std::error::Error>> {
    let number = normalize(raw)?;
    tracing::debug!(masked = %number.masked(), "Identity number accepted");

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{number}")?;
    Ok(())
}

fn normalize(raw: &str) -> Result<IdentityNumber, IdentityNumberError> {
    IdentityNumber::parse(raw.trim_end_matches(['\r', '\n']))
}
