//! Rate limiting for snapshot streams

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add coalescing to any Stream
pub trait CoalesceExt: Stream {
    /// Emit at most once per `period`.
    ///
    /// Uses "latest-wins" semantics: items arriving within one period replace
    /// each other and only the newest is emitted. When the inner stream ends
    /// the held item is flushed immediately.
    fn coalesce(self, period: Duration) -> Coalesce<Self>
    where
        Self: Sized,
    {
        Coalesce::new(self, period)
    }
}

impl<T: Stream> CoalesceExt for T {}

pin_project! {
    /// Stream returned by [`CoalesceExt::coalesce`]
    pub struct Coalesce<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        done: bool,
    }
}

impl<S: Stream> Coalesce<S> {
    pub fn new(stream: S, period: Duration) -> Self {
        // interval() panics on a zero period
        let mut interval = interval(period.max(Duration::from_micros(1)));
        // Delay rather than burst after a quiet stretch
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, interval, pending: None, done: false }
    }
}

impl<S: Stream> Stream for Coalesce<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain whatever is ready, keeping only the latest
        while !*this.done {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_none() {
            return if *this.done { Poll::Ready(None) } else { Poll::Pending };
        }
        if *this.done {
            return Poll::Ready(this.pending.take());
        }

        ready!(this.interval.poll_tick(cx));
        Poll::Ready(this.pending.take())
    }
}
