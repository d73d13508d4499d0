//! The externally-driven facade combining one [`Sender`] and one [`Receiver`]
//! over a pair of channels, matching the reference source's single
//! `RDTLayer` class (SPEC_FULL.md S9, "Open question (resolved)").

use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::receiver::Receiver;
use crate::sender::Sender;

pub struct RdtLayer<C: Channel> {
    send_channel: Option<C>,
    receive_channel: Option<C>,
    sender: Sender,
    receiver: Receiver,
    current_iteration: i64,
}

impl<C: Channel> RdtLayer<C> {
    pub fn new() -> Self {
        RdtLayer {
            send_channel: None,
            receive_channel: None,
            sender: Sender::new(),
            receiver: Receiver::new(),
            current_iteration: 0,
        }
    }

    pub fn set_send_channel(&mut self, channel: C) {
        self.send_channel = Some(channel);
    }

    pub fn set_receive_channel(&mut self, channel: C) {
        self.receive_channel = Some(channel);
    }

    pub fn set_data_to_send(&mut self, data: impl Into<String>) {
        self.sender.set_data_to_send(data);
    }

    pub fn data_received(&self) -> &str {
        self.receiver.data_received()
    }

    pub fn sender_fully_delivered(&self) -> bool {
        self.sender.is_fully_delivered()
    }

    pub fn count_segment_timeouts(&self) -> u32 {
        self.sender.count_segment_timeouts
    }

    pub fn duplicate_acks_received(&self) -> u32 {
        self.sender.duplicate_acks_received
    }

    pub fn duplicate_data_received(&self) -> u32 {
        self.receiver.duplicate_data_received
    }

    /// One tick: sender duties (retransmit, then send-new) followed by
    /// draining every pending inbound segment (SPEC_FULL.md S4.6/S4.7).
    pub fn process_data(&mut self) -> Result<()> {
        self.current_iteration += 1;

        {
            let channel = self.send_channel.as_mut().ok_or(Error::NoSendChannel)?;
            self.sender.tick(channel, self.current_iteration);
        }

        let incoming = {
            let channel = self
                .receive_channel
                .as_mut()
                .ok_or(Error::NoReceiveChannel)?;
            channel.receive()
        };

        for segment in incoming {
            match segment.acknum {
                Some(acknum) => self.sender.process_ack_segment(acknum),
                None => {
                    let channel = self.send_channel.as_mut().ok_or(Error::NoSendChannel)?;
                    self.receiver
                        .process_data_segment(channel, &segment, self.current_iteration);
                }
            }
        }

        Ok(())
    }
}

impl<C: Channel> Default for RdtLayer<C> {
    fn default() -> Self {
        Self::new()
    }
}
