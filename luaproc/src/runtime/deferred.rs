use log::debug;

use crate::api::{Args, Ret};
use crate::core::error::HostResult;

/// Canonical handler shape shared by every API command.
pub type Handler<C> = fn(&mut C, &Args) -> HostResult<Ret>;

/// A command recorded during Setup together with its validated arguments.
pub struct DeferredCall<C> {
    pub name: &'static str,
    handler: Handler<C>,
    args: Args,
}

/// FIFO of calls that need a live surface. Draining consumes the queue, and
/// the slot it leaves behind is sealed against further recording.
pub struct DeferredCallQueue<C> {
    calls: Vec<DeferredCall<C>>,
    sealed: bool,
}

impl<C> Default for DeferredCallQueue<C> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            sealed: false,
        }
    }
}

impl<C> DeferredCallQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder left in place of a queue that has been taken for
    /// flushing.
    pub fn sealed() -> Self {
        Self {
            calls: Vec::new(),
            sealed: true,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// # Panics
    ///
    /// Panics when called on a sealed queue.
    pub fn enqueue(
        &mut self,
        name: &'static str,
        handler: Handler<C>,
        args: Args,
    ) {
        assert!(
            !self.sealed,
            "'{name}' recorded after the deferred queue was flushed"
        );
        debug!("deferring '{}'", name);
        self.calls.push(DeferredCall {
            name,
            handler,
            args,
        });
    }

    /// Runs every recorded call in insertion order. Stops at the first
    /// failure.
    pub fn flush(self, ctx: &mut C) -> HostResult<usize> {
        assert!(!self.sealed, "sealed deferred queue flushed");
        let count = self.calls.len();
        for call in self.calls {
            debug!("replaying '{}'", call.name);
            (call.handler)(ctx, &call.args)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Arg;
    use crate::core::error::HostError;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<f64>,
    }

    fn record(ctx: &mut Recorder, args: &Args) -> HostResult<Ret> {
        ctx.seen.push(args.number(0));
        Ok(Ret::None)
    }

    fn fail(_: &mut Recorder, _: &Args) -> HostResult<Ret> {
        Err(HostError::backend("boom"))
    }

    #[test]
    fn replays_in_fifo_order() {
        let mut queue = DeferredCallQueue::new();
        for v in [3.0, 1.0, 2.0] {
            queue.enqueue("record", record, Args::new(vec![Arg::Number(v)]));
        }
        let names: Vec<_> = queue.calls.iter().map(|call| call.name).collect();
        assert_eq!(names, ["record"; 3]);

        let mut recorder = Recorder::default();
        assert_eq!(queue.flush(&mut recorder).unwrap(), 3);
        assert_eq!(recorder.seen, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn stops_on_first_failure() {
        let mut queue = DeferredCallQueue::new();
        queue.enqueue("record", record, Args::new(vec![Arg::Number(1.0)]));
        queue.enqueue("fail", fail, Args::default());
        queue.enqueue("record", record, Args::new(vec![Arg::Number(2.0)]));

        let mut recorder = Recorder::default();
        assert!(queue.flush(&mut recorder).is_err());
        assert_eq!(recorder.seen, [1.0]);
    }

    #[test]
    #[should_panic(expected = "after the deferred queue was flushed")]
    fn sealed_queue_rejects_recording() {
        let mut queue = DeferredCallQueue::<Recorder>::sealed();
        queue.enqueue("record", record, Args::default());
    }
}
