//! Forward notifications to several sinks.

use crate::domain::error::SignalwatchError;
use crate::domain::signal::Signal;
use crate::domain::summary::MarketSummary;
use crate::ports::notify_port::NotifyPort;

/// Delivers to every sink even if an earlier one fails; the first error is
/// returned.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn NotifyPort>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Box<dyn NotifyPort>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each(
        &self,
        mut f: impl FnMut(&dyn NotifyPort) -> Result<(), SignalwatchError>,
    ) -> Result<(), SignalwatchError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = f(sink.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl NotifyPort for Fanout {
    fn send_signal(&self, signal: &Signal) -> Result<(), SignalwatchError> {
        self.each(|sink| sink.send_signal(signal))
    }

    fn send_summary(&self, summary: &MarketSummary) -> Result<(), SignalwatchError> {
        self.each(|sink| sink.send_summary(summary))
    }

    fn send_status(&self, message: &str) -> Result<(), SignalwatchError> {
        self.each(|sink| sink.send_status(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl NotifyPort for Counting {
        fn send_signal(&self, _signal: &Signal) -> Result<(), SignalwatchError> {
            unreachable!()
        }

        fn send_summary(&self, _summary: &MarketSummary) -> Result<(), SignalwatchError> {
            unreachable!()
        }

        fn send_status(&self, _message: &str) -> Result<(), SignalwatchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(SignalwatchError::Notify {
                    reason: "down".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn failure_does_not_block_later_sinks() {
        let calls = Rc::new(Cell::new(0));
        let fanout = Fanout::new()
            .with(Box::new(Counting {
                calls: Rc::clone(&calls),
                fail: true,
            }))
            .with(Box::new(Counting {
                calls: Rc::clone(&calls),
                fail: false,
            }));

        assert_eq!(fanout.len(), 2);
        assert!(fanout.send_status("hello").is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn empty_fanout_succeeds() {
        let fanout = Fanout::new();
        assert!(fanout.is_empty());
        assert!(fanout.send_status("hello").is_ok());
    }
}
