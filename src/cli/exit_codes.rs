//! Exit codes for the CLI
//!
//! Standard exit codes used by actionsgate for CI/CD integration.
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Operation completed, no drift |
//! | 1 | `PARTIAL_APPLY` | Permissions written, allowed actions not |
//! | 2 | `DRIFT_DETECTED` | `plan` found differences |
//! | 3 | `ERROR` | Runtime error (network, API, state file) |
//! | 4 | `INVALID_CONFIG` | Desired policy rejected, unknown preset |

/// Success - operation completed, remote matches the configuration.
pub const SUCCESS: i32 = 0;

/// Apply wrote repository permissions but failed on allowed actions.
///
/// Re-running apply converges.
pub const PARTIAL_APPLY: i32 = 1;

/// Drift detected by `plan`.
///
/// Used when:
/// - The remote differs from the configured policy
/// - No state exists yet and a create is planned
pub const DRIFT_DETECTED: i32 = 2;

/// Runtime error (network error, API error, policy record absent, etc.).
pub const ERROR: i32 = 3;

/// Invalid configuration.
///
/// Used when:
/// - The desired policy violates the enablement / allowed-actions constraint
/// - Unknown preset name provided
/// - No organization configured
pub const INVALID_CONFIG: i32 = 4;
