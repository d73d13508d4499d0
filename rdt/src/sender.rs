//! Sender half of the Selective-Repeat state machine (SPEC_FULL.md S4.6),
//! grounded on the reference `RDTLayer`'s `sendNewPacketsInWindow` /
//! `checkTimeoutsAndRetransmit` / `processAckSegment`.

use std::collections::HashMap;

use crate::channel::Channel;
use crate::constants::{DATA_LENGTH, FLOW_CONTROL_WIN_SIZE, MAX_NEW_SEGMENTS_PER_TICK, TIMEOUT_ITERATIONS};
use crate::segment::Segment;

#[derive(Debug, Default)]
pub struct Sender {
    data_to_send: String,
    send_base: usize,
    next_seq_num: usize,
    sent_segments: HashMap<usize, (Segment, i64)>,
    sndpkt: HashMap<usize, Segment>,
    pub count_segment_timeouts: u32,
    pub duplicate_acks_received: u32,
}

impl Sender {
    pub fn new() -> Self {
        Sender::default()
    }

    pub fn set_data_to_send(&mut self, data: impl Into<String>) {
        self.data_to_send = data.into();
        self.send_base = 0;
        self.next_seq_num = 0;
        self.sent_segments.clear();
        self.sndpkt.clear();
    }

    pub fn send_base(&self) -> usize {
        self.send_base
    }

    pub fn is_fully_delivered(&self) -> bool {
        self.send_base >= self.data_to_send.len()
    }

    /// Runs one tick's worth of sender duties: retransmit first, then fill
    /// the window with new segments (SPEC_FULL.md S4.6 priority policy).
    pub fn tick<C: Channel>(&mut self, channel: &mut C, current_iteration: i64) {
        if self.data_to_send.is_empty() {
            return;
        }
        self.check_timeouts_and_retransmit(channel, current_iteration);
        self.send_new_packets_in_window(channel, current_iteration);
    }

    fn check_timeouts_and_retransmit<C: Channel>(&mut self, channel: &mut C, current_iteration: i64) {
        let timed_out: Vec<usize> = self
            .sent_segments
            .iter()
            .filter(|(_, (_, send_time))| current_iteration - send_time >= TIMEOUT_ITERATIONS)
            .map(|(seq, _)| *seq)
            .collect();

        for seq in timed_out {
            let payload = match self.sndpkt.get(&seq) {
                Some(segment) => segment.payload.clone(),
                None => continue,
            };
            let retransmitted = Segment::data(seq, payload, current_iteration);
            self.sndpkt.insert(seq, retransmitted.clone());
            self.sent_segments.insert(seq, (retransmitted.clone(), current_iteration));
            channel.send(retransmitted);
            self.count_segment_timeouts += 1;
        }
    }

    fn send_new_packets_in_window<C: Channel>(&mut self, channel: &mut C, current_iteration: i64) {
        let mut sent_this_tick = 0;
        while self.next_seq_num < self.data_to_send.len()
            && self.next_seq_num < self.send_base + FLOW_CONTROL_WIN_SIZE
            && sent_this_tick < MAX_NEW_SEGMENTS_PER_TICK
        {
            let start = self.next_seq_num;
            let end = (start + DATA_LENGTH).min(self.data_to_send.len());
            let chunk = self.data_to_send[start..end].to_string();

            let segment = Segment::data(start, chunk, current_iteration);
            self.sndpkt.insert(start, segment.clone());
            self.sent_segments.insert(start, (segment.clone(), current_iteration));
            channel.send(segment);

            self.next_seq_num = end;
            sent_this_tick += 1;
        }
    }

    /// Handles an inbound ACK for byte offset `acknum`.
    pub fn process_ack_segment(&mut self, acknum: usize) {
        if !self.sent_segments.contains_key(&acknum) {
            self.duplicate_acks_received += 1;
            return;
        }
        self.sent_segments.remove(&acknum);
        self.sndpkt.remove(&acknum);

        if acknum == self.send_base {
            while self.send_base < self.next_seq_num && !self.sent_segments.contains_key(&self.send_base) {
                let next = self.next_segment_boundary(self.send_base);
                if next == self.send_base {
                    break;
                }
                self.send_base = next;
            }
        }
    }

    /// Byte offset at which the segment starting at or after `pos` ends,
    /// clamped to the total data length (SPEC_FULL.md S9, "send_base slide").
    fn next_segment_boundary(&self, pos: usize) -> usize {
        if pos >= self.data_to_send.len() {
            return self.data_to_send.len();
        }
        let segment_start = (pos / DATA_LENGTH) * DATA_LENGTH;
        (segment_start + DATA_LENGTH).min(self.data_to_send.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::SimulatedChannel;
    use crate::channel::ChannelConfig;

    #[test]
    fn window_caps_new_segments_per_tick() {
        let mut sender = Sender::new();
        sender.set_data_to_send("abcdefghijklmnopqrstuvwx"); // 24 chars, plenty to fill the window
        let mut channel = SimulatedChannel::new(ChannelConfig::default());

        sender.tick(&mut channel, 1);
        // 4 segments of DATA_LENGTH=4 each, capped by MAX_NEW_SEGMENTS_PER_TICK.
        assert_eq!(sender.next_seq_num, 16);
        assert_eq!(channel.receive().len(), MAX_NEW_SEGMENTS_PER_TICK);
    }

    #[test]
    fn ack_for_base_slides_window_forward() {
        let mut sender = Sender::new();
        sender.set_data_to_send("abcdefghijklmnop"); // 16 chars
        let mut channel = SimulatedChannel::new(ChannelConfig::default());
        sender.tick(&mut channel, 1);

        sender.process_ack_segment(0);
        assert_eq!(sender.send_base(), 4);
    }

    #[test]
    fn ack_for_non_outstanding_segment_counts_as_duplicate() {
        let mut sender = Sender::new();
        sender.set_data_to_send("abcd");
        sender.process_ack_segment(0);
        assert_eq!(sender.duplicate_acks_received, 1);
    }

    #[test]
    fn timeout_triggers_retransmission_and_counts_it() {
        let mut sender = Sender::new();
        sender.set_data_to_send("abcd");
        let mut channel = SimulatedChannel::new(ChannelConfig::default());
        sender.tick(&mut channel, 1);
        channel.receive(); // drain the initial send

        sender.tick(&mut channel, 1 + TIMEOUT_ITERATIONS);
        assert_eq!(sender.count_segment_timeouts, 1);
        assert_eq!(channel.receive().len(), 1);
    }
}
