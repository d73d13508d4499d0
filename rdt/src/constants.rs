//! Tunable constants for the Selective-Repeat state machine (SPEC_FULL.md
//! S3), grounded on the reference `RDTLayer`'s class-scope values.

/// Characters of payload per segment.
pub const DATA_LENGTH: usize = 4;
/// Max in-flight (sender) / bufferable (receiver) byte span.
pub const FLOW_CONTROL_WIN_SIZE: usize = 15;
/// Ticks a segment may go unacknowledged before it is retransmitted.
pub const TIMEOUT_ITERATIONS: i64 = 8;
/// New segments a single tick may transmit, excluding retransmissions. The
/// reference source hardcodes this rather than actually computing
/// `FLOW_CONTROL_WIN_SIZE / DATA_LENGTH` (which truncates to 3); kept as a
/// literal to match its observable behavior.
pub const MAX_NEW_SEGMENTS_PER_TICK: usize = 4;
