// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
// No decoding, bucketing or file formats live here, only the
// order in which things happen.
//
// Reference: Clean Architecture pattern

// Directory + transcripts → manifest
pub mod build_use_case;

// Manifest → epoch plans (+ optional collation check)
pub mod plan_use_case;
