//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — CI pipelines rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                  |
//! |---------|-----------|----------------------------------------------|
//! | 0       | Universal | Success                                      |
//! | 1       | Universal | General error (unspecified)                  |
//! | 2       | Universal | CLI usage error (bad args, missing file)     |
//! | 3-9     | validate  | Reconciliation run codes                     |
//! | 20-29   | fix       | Single-field fix codes                       |
//! | 50-59   | store     | Record-store transport codes                 |

use muster_store_client::StoreError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Validate (3-9)
// =============================================================================

/// The reconciliation ran and found issues. Like `diff(1)`, a non-zero
/// exit here means "the sources differ", not that the tool failed.
pub const EXIT_VALIDATE_ISSUES: u8 = 3;

/// A source failed to load; the run was aborted with no partial report.
pub const EXIT_VALIDATE_LOAD: u8 = 4;

/// muster.toml failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 5;

// =============================================================================
// Fix (20-29)
// =============================================================================

/// The requested unit/field has no current mismatch to apply.
pub const EXIT_FIX_NO_MISMATCH: u8 = 20;

/// The store value moved since the mismatch was detected (concurrent
/// edit); nothing was written.
pub const EXIT_FIX_STALE: u8 = 21;

/// The write went through but the follow-up read did not show the desired
/// value.
pub const EXIT_FIX_UNVERIFIED: u8 = 22;

// =============================================================================
// Store transport (50-59)
// =============================================================================

/// No API token configured (env var unset or empty).
pub const EXIT_STORE_NOT_AUTH: u8 = 50;

/// Auth rejected by the store (401/403).
pub const EXIT_STORE_AUTH: u8 = 51;

/// Request rejected as invalid (400).
pub const EXIT_STORE_VALIDATION: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_STORE_RATE_LIMIT: u8 = 53;

/// Upstream error (5xx), parse failure, or network failure after retries.
pub const EXIT_STORE_UPSTREAM: u8 = 54;

/// Map a StoreError to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::NotAuthenticated => EXIT_STORE_NOT_AUTH,
        StoreError::Auth(..) => EXIT_STORE_AUTH,
        StoreError::Validation(_) => EXIT_STORE_VALIDATION,
        StoreError::RateLimited => EXIT_STORE_RATE_LIMIT,
        StoreError::NotFound(_)
        | StoreError::Upstream(_)
        | StoreError::Parse(_)
        | StoreError::PaginationStuck(_) => EXIT_STORE_UPSTREAM,
    }
}
