//! Channel unit carried between peers: either a data segment (`seqnum` set,
//! `acknum` none) or an ACK (`acknum` set, `seqnum` none). Grounded on the
//! reference `Segment` type's `setData`/`setAck`/`checkChecksum` (SPEC_FULL.md
//! S3, "Rdt Segment").

/// One data or ACK unit. `Option<usize>` replaces the reference segment's
/// string sentinel `"-1"` for "not set" (SPEC_FULL.md S9).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub seqnum: Option<usize>,
    pub acknum: Option<usize>,
    pub payload: String,
    pub start_iteration: i64,
    checksum: u32,
}

impl Segment {
    /// Builds a data segment carrying `payload` at byte offset `seqnum`.
    pub fn data(seqnum: usize, payload: impl Into<String>, start_iteration: i64) -> Self {
        let payload = payload.into();
        let checksum = compute_checksum(Some(seqnum), None, &payload);
        Segment {
            seqnum: Some(seqnum),
            acknum: None,
            payload,
            start_iteration,
            checksum,
        }
    }

    /// Builds an ACK-only segment for byte offset `acknum`.
    pub fn ack(acknum: usize, start_iteration: i64) -> Self {
        let checksum = compute_checksum(None, Some(acknum), "");
        Segment {
            seqnum: None,
            acknum: Some(acknum),
            payload: String::new(),
            start_iteration,
            checksum,
        }
    }

    /// True unless something (the simulated channel, usually) has
    /// corrupted this segment since it was built.
    pub fn check_checksum(&self) -> bool {
        self.checksum == compute_checksum(self.seqnum, self.acknum, &self.payload)
    }

    /// Flips the stored checksum so `check_checksum` will fail, simulating
    /// a transmission error.
    pub fn corrupt(&mut self) {
        self.checksum = self.checksum.wrapping_add(1);
    }
}

fn compute_checksum(seqnum: Option<usize>, acknum: Option<usize>, payload: &str) -> u32 {
    let mut sum: u32 = 0;
    if let Some(s) = seqnum {
        sum = s.to_string().bytes().fold(sum, |acc, b| acc.wrapping_add(b as u32));
    }
    if let Some(a) = acknum {
        sum = a.to_string().bytes().fold(sum, |acc, b| acc.wrapping_add(b as u32));
    }
    payload.bytes().fold(sum, |acc, b| acc.wrapping_add(b as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_data_segment_passes_its_own_checksum() {
        let segment = Segment::data(4, "abcd", 1);
        assert!(segment.check_checksum());
        assert_eq!(segment.seqnum, Some(4));
        assert_eq!(segment.acknum, None);
    }

    #[test]
    fn corrupt_flips_the_checksum() {
        let mut segment = Segment::data(0, "abcd", 1);
        assert!(segment.check_checksum());
        segment.corrupt();
        assert!(!segment.check_checksum());
    }

    #[test]
    fn ack_segment_carries_no_payload() {
        let ack = Segment::ack(8, 2);
        assert_eq!(ack.acknum, Some(8));
        assert_eq!(ack.seqnum, None);
        assert!(ack.check_checksum());
    }
}
