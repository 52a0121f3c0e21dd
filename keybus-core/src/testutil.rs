//! Mock lines and a virtual clock for host tests
//!
//! These implement the HAL traits without hardware: delays are recorded
//! instead of spun, and the data line can be scripted to play a keypad's
//! part in a transaction.

use heapless::{Deque, Vec};
use keybus_hal::{DelayUs, InputPin, OutputPin};

/// Output pin that records every level driven onto it
pub struct RecordingPin {
    level: bool,
    history: Vec<bool, 64>,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self {
            level: false,
            history: Vec::new(),
        }
    }

    /// Current driven level
    pub fn level(&self) -> bool {
        self.level
    }

    /// Every level driven, in order
    pub fn levels(&self) -> &[bool] {
        &self.history
    }
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) {
        self.level = true;
        self.history.push(true).unwrap();
    }

    fn set_low(&mut self) {
        self.level = false;
        self.history.push(false).unwrap();
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

impl InputPin for RecordingPin {
    fn is_high(&mut self) -> bool {
        self.level
    }
}

/// Data line scripted to play the keypad's part
///
/// Levels driven by the master are recorded; samples are answered from
/// the script. Once the script is exhausted the line floats high, as a
/// silent bus would.
pub struct ScriptedPin {
    level: bool,
    driven: Vec<bool, 64>,
    script: Deque<bool, 64>,
}

impl ScriptedPin {
    pub fn new(script: &[bool]) -> Self {
        let mut queue = Deque::new();
        for &bit in script {
            queue.push_back(bit).unwrap();
        }
        Self {
            level: false,
            driven: Vec::new(),
            script: queue,
        }
    }

    /// Every level the master drove, in order
    pub fn driven(&self) -> &[bool] {
        &self.driven
    }

    /// Current driven level
    pub fn level(&self) -> bool {
        self.level
    }
}

impl OutputPin for ScriptedPin {
    fn set_high(&mut self) {
        self.level = true;
        self.driven.push(true).unwrap();
    }

    fn set_low(&mut self) {
        self.level = false;
        self.driven.push(false).unwrap();
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> bool {
        self.script.pop_front().unwrap_or(true)
    }
}

/// Data line that echoes driven bits back on sample, oldest first
pub struct LoopbackPin {
    level: bool,
    echo: Deque<bool, 64>,
}

impl LoopbackPin {
    pub fn new() -> Self {
        Self {
            level: false,
            echo: Deque::new(),
        }
    }
}

impl OutputPin for LoopbackPin {
    fn set_high(&mut self) {
        self.level = true;
        self.echo.push_back(true).unwrap();
    }

    fn set_low(&mut self) {
        self.level = false;
        self.echo.push_back(false).unwrap();
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

impl InputPin for LoopbackPin {
    fn is_high(&mut self) -> bool {
        self.echo.pop_front().unwrap_or(true)
    }
}

/// Delay that records requested waits instead of spinning
pub struct VirtualClock {
    delays: Vec<u32, 128>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self { delays: Vec::new() }
    }

    /// Every delay requested, in order, in microseconds
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Total virtual time elapsed in microseconds
    pub fn elapsed_us(&self) -> u64 {
        self.delays.iter().map(|&us| u64::from(us)).sum()
    }
}

impl DelayUs for VirtualClock {
    fn delay_us(&mut self, us: u32) {
        self.delays.push(us).unwrap();
    }
}
