// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches disk on behalf of the other layers:
//
//   manifest.rs    — the built dataset as JSON (records in
//                    index order)
//
//   plan_store.rs  — epoch plans and the config that produced
//                    them, as JSON, so a plan can be replayed
//
//   plan_stats.rs  — per-epoch, per-bucket CSV statistics
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Dataset manifest load / save
pub mod manifest;

/// Epoch plan + plan config persistence
pub mod plan_store;

/// Per-bucket plan statistics CSV logger
pub mod plan_stats;
