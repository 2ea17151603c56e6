//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use pico_command_coordinator::ByteSource;

/// Byte source fed from a script.
///
/// Bytes in `pending` are available right away. Each later burst becomes
/// available only after the reader has seen the source empty once, which is
/// how a slow sender looks across a settle delay.
#[derive(Default)]
pub struct ScriptedSource {
    pending: VecDeque<u8>,
    bursts: VecDeque<Vec<u8>>,
    flood: Option<u8>,
    pub reads: usize,
}

impl ScriptedSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            pending: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A sender that never stops transmitting `byte`.
    pub fn flooding(byte: u8) -> Self {
        Self {
            flood: Some(byte),
            ..Self::default()
        }
    }

    pub fn then(mut self, burst: &[u8]) -> Self {
        self.bursts.push_back(burst.to_vec());
        self
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        self.pending.len() + self.bursts.iter().map(Vec::len).sum::<usize>()
    }
}

impl ByteSource for ScriptedSource {
    fn available(&mut self) -> usize {
        if self.flood.is_some() {
            return 1;
        }
        if self.pending.is_empty() {
            if let Some(burst) = self.bursts.pop_front() {
                self.pending.extend(burst);
            }
            return 0;
        }
        self.pending.len()
    }

    fn read_byte(&mut self) -> u8 {
        self.reads += 1;
        match self.flood {
            Some(byte) => byte,
            None => self
                .pending
                .pop_front()
                .expect("read_byte called with nothing available"),
        }
    }
}

/// Delay that records every requested pause in milliseconds instead of
/// sleeping. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    log: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<u32> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(ms);
    }
}
