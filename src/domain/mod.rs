// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define what the system
// is about: audio records, their durations, and the bucket
// configuration that partitions those durations.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A manifest row and its decoded counterpart
pub mod audio_record;

// Duration boundaries, per-bucket batch sizes, classification
pub mod buckets;

// Core abstractions (traits) that other layers implement
pub mod traits;
