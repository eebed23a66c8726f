/*++

Licensed under the Apache-2.0 license.

File Name:

    clock.rs

Abstract:

    File contains the system clock for the SoC model.

--*/

use crate::bus::Bus;
use std::cell::Cell;

/// Free-running system clock. The model is evaluated one cycle at a time;
/// every increment polls the bus so that each clocked block sees every edge.
pub struct Clock {
    now: Cell<u64>,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    /// Current cycle count.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Advance the clock by `cycles`, polling `bus` once per cycle.
    pub fn increment_and_poll(&self, cycles: u64, bus: &mut impl Bus) {
        for _ in 0..cycles {
            self.now.set(self.now.get() + 1);
            bus.poll();
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{RvAddr, RvData, RvSize};
    use crate::BusError;

    struct CycleCounter {
        polls: u64,
    }

    impl Bus for CycleCounter {
        fn read(&mut self, _size: RvSize, _addr: RvAddr) -> Result<RvData, BusError> {
            Err(BusError::LoadAccessFault)
        }

        fn write(&mut self, _size: RvSize, _addr: RvAddr, _val: RvData) -> Result<(), BusError> {
            Err(BusError::StoreAccessFault)
        }

        fn poll(&mut self) {
            self.polls += 1;
        }
    }

    #[test]
    fn test_clock_polls_once_per_cycle() {
        let clock = Clock::new();
        let mut bus = CycleCounter { polls: 0 };
        assert_eq!(clock.now(), 0);
        clock.increment_and_poll(17, &mut bus);
        assert_eq!(clock.now(), 17);
        assert_eq!(bus.polls, 17);
    }
}
