use std::cell::RefCell;
use std::rc::Rc;

use clap::{App, Arg};

use rdt_core::{Channel, ChannelConfig, RdtLayer, Segment, SimulatedChannel};

/// One direction of a simulated link, shared by the two `RdtLayer`s that
/// talk across it: the sending peer calls `send`, the receiving peer calls
/// `receive`, both against the same underlying channel.
#[derive(Clone)]
struct SharedChannel(Rc<RefCell<SimulatedChannel>>);

impl SharedChannel {
    fn new_pair(config: ChannelConfig) -> (Self, Self) {
        let inner = Rc::new(RefCell::new(SimulatedChannel::new(config)));
        (SharedChannel(inner.clone()), SharedChannel(inner))
    }

    fn advance_tick(&self) {
        self.0.borrow_mut().advance_tick();
    }
}

impl Channel for SharedChannel {
    fn send(&mut self, segment: Segment) {
        self.0.borrow_mut().send(segment);
    }

    fn receive(&mut self) -> Vec<Segment> {
        self.0.borrow_mut().receive()
    }
}

fn main() {
    let matches = App::new("rdt-sim")
        .about("Delivers a payload between two peers over a lossy, reordering, delaying, corrupting simulated channel")
        .version("0.1.0")
        .arg(
            Arg::new("PAYLOAD")
                .long("payload")
                .takes_value(true)
                .default_value("abcdefghijklmnopqrstuvwxyz"),
        )
        .arg(
            Arg::new("LOSS")
                .long("loss-rate")
                .takes_value(true)
                .default_value("0.1"),
        )
        .arg(
            Arg::new("CORRUPTION")
                .long("corruption-rate")
                .takes_value(true)
                .default_value("0.1"),
        )
        .arg(
            Arg::new("REORDER")
                .long("reorder-rate")
                .takes_value(true)
                .default_value("0.1"),
        )
        .arg(
            Arg::new("DELAY")
                .long("max-delay")
                .takes_value(true)
                .default_value("2")
                .help("Max simulated delay, in ticks"),
        )
        .arg(
            Arg::new("MAX_TICKS")
                .long("max-ticks")
                .takes_value(true)
                .default_value("500"),
        )
        .arg(
            Arg::new("VERBOSE")
                .short('v')
                .long("verbose")
                .help("Print per-segment channel events"),
        )
        .get_matches();

    let payload = matches.value_of("PAYLOAD").unwrap().to_string();
    let loss_rate: f64 = matches
        .value_of("LOSS")
        .unwrap()
        .parse()
        .expect("loss-rate must be a float");
    let corruption_rate: f64 = matches
        .value_of("CORRUPTION")
        .unwrap()
        .parse()
        .expect("corruption-rate must be a float");
    let reorder_rate: f64 = matches
        .value_of("REORDER")
        .unwrap()
        .parse()
        .expect("reorder-rate must be a float");
    let max_delay_ticks: i64 = matches
        .value_of("DELAY")
        .unwrap()
        .parse()
        .expect("max-delay must be an integer");
    let max_ticks: u32 = matches
        .value_of("MAX_TICKS")
        .unwrap()
        .parse()
        .expect("max-ticks must be an integer");
    let verbose = matches.is_present("VERBOSE");

    let config = ChannelConfig {
        loss_rate,
        corruption_rate,
        reorder_rate,
        max_delay_ticks,
        verbose,
    };

    let (a_to_b_send, a_to_b_recv) = SharedChannel::new_pair(config.clone());
    let (b_to_a_send, b_to_a_recv) = SharedChannel::new_pair(config);
    let a_to_b_ticker = a_to_b_send.clone();
    let b_to_a_ticker = b_to_a_send.clone();

    let mut peer_a = RdtLayer::new();
    peer_a.set_send_channel(a_to_b_send);
    peer_a.set_receive_channel(b_to_a_recv);
    peer_a.set_data_to_send(payload.clone());

    let mut peer_b = RdtLayer::new();
    peer_b.set_send_channel(b_to_a_send);
    peer_b.set_receive_channel(a_to_b_recv);

    println!(
        "Delivering {} bytes a -> b (loss={loss_rate}, corruption={corruption_rate}, reorder={reorder_rate}, max_delay={max_delay_ticks})",
        payload.len()
    );

    let mut ticks_run = 0;
    for tick in 1..=max_ticks {
        peer_a.process_data().expect("peer a channels are configured");
        peer_b.process_data().expect("peer b channels are configured");
        a_to_b_ticker.advance_tick();
        b_to_a_ticker.advance_tick();
        ticks_run = tick;
        if peer_b.data_received() == payload {
            break;
        }
    }

    println!("Delivered after {ticks_run} ticks: {:?}", peer_b.data_received());
    println!(
        "Stats - timeouts={}, duplicate_acks={}, duplicate_data={}",
        peer_a.count_segment_timeouts(),
        peer_a.duplicate_acks_received(),
        peer_b.duplicate_data_received(),
    );

    if peer_b.data_received() != payload {
        eprintln!("did not converge within {max_ticks} ticks");
        std::process::exit(1);
    }
}
