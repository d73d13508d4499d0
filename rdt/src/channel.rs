//! The lower-layer collaborator behind [`crate::layer::RdtLayer`]: an opaque
//! bidirectional segment transport (SPEC_FULL.md S6, "Channel contract").
//! `SimulatedChannel` is the in-process implementation used by tests and the
//! demo harness, introducing loss, reordering, delay, and corruption.

use crate::segment::Segment;

/// `send` is fire-and-forget; `receive` drains everything that has arrived
/// since the previous call.
pub trait Channel {
    fn send(&mut self, segment: Segment);
    fn receive(&mut self) -> Vec<Segment>;
}

/// Per-instance tunables for [`SimulatedChannel`], replacing any notion of
/// global debug flags (SPEC_FULL.md S9, "Global debug flags").
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub loss_rate: f64,
    pub corruption_rate: f64,
    pub reorder_rate: f64,
    pub max_delay_ticks: i64,
    pub verbose: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            loss_rate: 0.0,
            corruption_rate: 0.0,
            reorder_rate: 0.0,
            max_delay_ticks: 0,
            verbose: false,
        }
    }
}

/// A one-directional segment channel with independently configurable loss,
/// corruption, reordering, and delay. `rdt-sim` wires two of these
/// back-to-back (one per direction) to connect a pair of `RdtLayer`s.
pub struct SimulatedChannel {
    config: ChannelConfig,
    in_flight: Vec<(i64, Segment)>,
    current_tick: i64,
}

impl SimulatedChannel {
    pub fn new(config: ChannelConfig) -> Self {
        SimulatedChannel {
            config,
            in_flight: Vec::new(),
            current_tick: 0,
        }
    }

    /// Advances the channel's clock by one tick, making any segments whose
    /// delay has elapsed eligible for the next `receive()`.
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }
}

impl Channel for SimulatedChannel {
    fn send(&mut self, mut segment: Segment) {
        if rand::random::<f64>() < self.config.loss_rate {
            if self.config.verbose {
                println!("channel: dropped segment {:?}/{:?}", segment.seqnum, segment.acknum);
            }
            return;
        }
        if rand::random::<f64>() < self.config.corruption_rate {
            segment.corrupt();
        }
        let delay = if self.config.max_delay_ticks > 0 {
            (rand::random::<f64>() * (self.config.max_delay_ticks + 1) as f64) as i64
        } else {
            0
        };
        self.in_flight.push((self.current_tick + delay, segment));
    }

    fn receive(&mut self) -> Vec<Segment> {
        let mut ready = Vec::new();
        let mut pending = Vec::new();
        for (deliver_at, segment) in self.in_flight.drain(..) {
            if deliver_at <= self.current_tick {
                ready.push(segment);
            } else {
                pending.push((deliver_at, segment));
            }
        }
        self.in_flight = pending;

        if ready.len() >= 2 && rand::random::<f64>() < self.config.reorder_rate {
            ready.swap(0, 1);
        }
        ready
    }
}
