use std::time::Duration;

/// Blocking wait inserted before each continuation request.
///
/// Providers reject continuation tokens that are replayed too quickly, so
/// the cursor pauses the calling thread before every follow-up fetch.
pub trait Pause {
    /// Block for `duration`.
    fn pause(&self, duration: Duration);
}

/// [`Pause`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<P: Pause + ?Sized> Pause for &P {
    fn pause(&self, duration: Duration) {
        (**self).pause(duration);
    }
}
