//! The global time-step collective.
//!
//! Every step, each block contributes its local CFL bound and resumes with
//! the minimum over all blocks. The collective is a small reducer thread
//! with one channel pair per participant: it gathers one value from every
//! block, broadcasts the minimum, and repeats. Per-participant channels
//! (rather than one shared inbox) let the reducer notice a dead block at
//! the next round and shut the whole collective down instead of waiting
//! forever.
//!
//! Lock-step progress makes rounds unambiguous: no block can contribute to
//! round `k + 1` before it has received the result of round `k`.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use super::SimulationError;

/// One block's handle into the min-reduction collective.
#[derive(Debug)]
pub struct ReductionHandle {
    tx: Sender<f32>,
    rx: Receiver<f32>,
}

impl ReductionHandle {
    /// Contribute the local time-step bound and block until the global
    /// minimum is available.
    ///
    /// `+∞` means "no local constraint" (an all-dry block) and never wins
    /// the reduction against a finite bound.
    pub fn contribute(&self, local_dt: f32) -> Result<f32, SimulationError> {
        self.tx
            .send(local_dt)
            .map_err(|_| SimulationError::Disconnected)?;
        self.rx.recv().map_err(|_| SimulationError::Disconnected)
    }
}

/// Factory for the reducer thread.
pub struct MinReduction;

impl MinReduction {
    /// Spawn the reducer and return one handle per participant.
    ///
    /// The reducer thread exits as soon as any participant drops its
    /// handle, which releases every other participant with an error at
    /// their next contribution.
    pub fn spawn(participants: usize) -> Vec<ReductionHandle> {
        let mut handles = Vec::with_capacity(participants);
        let mut in_rxs = Vec::with_capacity(participants);
        let mut out_txs = Vec::with_capacity(participants);

        for _ in 0..participants {
            let (in_tx, in_rx) = channel();
            let (out_tx, out_rx) = channel();
            handles.push(ReductionHandle {
                tx: in_tx,
                rx: out_rx,
            });
            in_rxs.push(in_rx);
            out_txs.push(out_tx);
        }

        thread::spawn(move || {
            loop {
                let mut min = f32::INFINITY;
                for rx in &in_rxs {
                    match rx.recv() {
                        Ok(v) => min = min.min(v),
                        Err(_) => return,
                    }
                }
                for tx in &out_txs {
                    if tx.send(min).is_err() {
                        return;
                    }
                }
            }
        });

        handles
    }
}
