use std::{
    thread,
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::{error::Result, vision::MatchResult};

/// Runs `attempt` back to back until it finds something or `timeout` has elapsed.
///
/// At least one attempt is always made, even with a zero timeout. Between attempts
/// the thread only yields. An `Err` from `attempt` stops polling and is returned as is.
pub fn poll<F>(attempt: F, timeout: Duration) -> Result<MatchResult>
where
    F: FnMut() -> Result<MatchResult>,
{
    poll_until(attempt, MatchResult::found, timeout)
}

/// [`poll`] for attempts that carry more than a [`MatchResult`], e.g. the frame
/// they looked at. Returns the last attempt, successful or not.
pub fn poll_until<T, F, D>(mut attempt: F, done: D, timeout: Duration) -> Result<T>
where
    F: FnMut() -> Result<T>,
    D: Fn(&T) -> bool,
{
    let start = Instant::now();
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let res = attempt()?;
        if done(&res) {
            debug!(
                "[poll]: found after {attempts} attempt(s), {:?}",
                start.elapsed()
            );
            return Ok(res);
        }

        if start.elapsed() > timeout {
            warn!("[poll]: timed out after {attempts} attempt(s), {timeout:?}");
            return Ok(res);
        }
        thread::yield_now();
    }
}
