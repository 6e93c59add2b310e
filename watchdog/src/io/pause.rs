//! The fixed pause between a child exit and the next launch.

use std::thread;
use std::time::Duration;

pub trait Pause {
    /// Block for `delay`. Not interruptible.
    fn pause(&self, delay: Duration);
}

/// Pauses the calling thread.
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn thread_pause_waits_at_least_the_delay() {
        let started = Instant::now();
        ThreadPause.pause(Duration::from_millis(30));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
