//! Standalone add/cancel latency benchmark, reporting percentiles via
//! `hdrhistogram` rather than criterion's statistical model. Mirrors the
//! warmup-then-measure shape of a fixed-iteration replay driver: pregenerate
//! a workload, run it once to warm the allocator and caches, then record
//! per-operation wall-clock latency for the measured pass.

use hdrhistogram::Histogram;
use matching_book::prelude::*;
use std::time::Instant;

const WARMUP_ITERATIONS: usize = 10_000;
const MEASURED_ITERATIONS: usize = 100_000;

#[derive(Clone, Copy)]
enum Event {
    Add { id: OrderId, side: Side, price: Price, qty: Quantity },
    Cancel { id: OrderId },
}

/// Generates a pseudo-random add/cancel workload with a fixed cancel
/// probability, mirroring the distribution driver.hpp's generator produces.
struct AddCancelGenerator {
    next_id: u64,
    live: Vec<OrderId>,
    rng_state: u64,
    cancel_prob: u32,
    bid_prob: u32,
    min_price: i64,
    max_price: i64,
    min_qty: u64,
    max_qty: u64,
}

impl AddCancelGenerator {
    fn new(seed: u64) -> Self {
        AddCancelGenerator {
            next_id: 1,
            live: Vec::new(),
            rng_state: seed,
            cancel_prob: 30,
            bid_prob: 50,
            min_price: 95,
            max_price: 105,
            min_qty: 1,
            max_qty: 10_000,
        }
    }

    // xorshift64*: deterministic, no external RNG dependency needed for a benchmark driver.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    fn next_range(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound.max(1)
    }

    fn generate(&mut self) -> Event {
        if !self.live.is_empty() && self.next_range(100) < self.cancel_prob as u64 {
            let idx = self.next_range(self.live.len() as u64) as usize;
            let id = self.live.swap_remove(idx);
            return Event::Cancel { id };
        }

        let side = if self.next_range(100) < self.bid_prob as u64 { Side::Buy } else { Side::Sell };
        let price = self.min_price + self.next_range((self.max_price - self.min_price + 1) as u64) as i64;
        let qty = self.min_qty + self.next_range(self.max_qty - self.min_qty + 1);

        let id = OrderId::new(self.next_id);
        self.next_id += 1;
        self.live.push(id);

        Event::Add { id, side, price: Price::new(price), qty: Quantity::new(qty) }
    }
}

fn apply_event(book: &mut MatchingBook, event: Event) {
    match event {
        Event::Add { id, side, price, qty } => {
            if let Some(order) = Order::make_limit_gtc(id, side, price, qty) {
                book.add(order).unwrap();
            }
        }
        Event::Cancel { id } => {
            book.cancel(id);
        }
    }
}

fn main() {
    let mut book = MatchingBook::new();
    let mut gen = AddCancelGenerator::new(0x5eed_1234_f00d_ba11);

    let events: Vec<Event> = (0..WARMUP_ITERATIONS + MEASURED_ITERATIONS).map(|_| gen.generate()).collect();

    for &event in &events[..WARMUP_ITERATIONS] {
        apply_event(&mut book, event);
    }

    let mut histogram = Histogram::<u64>::new(3).expect("valid sigfigs");
    for &event in &events[WARMUP_ITERATIONS..] {
        let start = Instant::now();
        apply_event(&mut book, event);
        let elapsed_ns = start.elapsed().as_nanos() as u64;
        histogram.record(elapsed_ns).expect("latency within histogram range");
    }

    println!("p50: {} ns", histogram.value_at_quantile(0.50));
    println!("p90: {} ns", histogram.value_at_quantile(0.90));
    println!("p99: {} ns", histogram.value_at_quantile(0.99));
    println!("p999: {} ns", histogram.value_at_quantile(0.999));
    println!("max: {} ns", histogram.max());
}
