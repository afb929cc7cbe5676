// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Miscellaneous things.

use std::{
    thread,
    time::{Duration, Instant},
};

use console::Term;
use is_terminal::IsTerminal;

/// Is stdout or stderr attached to a terminal?
pub(crate) fn is_a_tty() -> bool {
    std::io::stdout().is_terminal() || std::io::stderr().is_terminal()
}

/// A line on stderr that gets redrawn in place. Drawing errors are ignored.
struct StatusLine {
    term: Term,
    drawn: bool,
}

impl StatusLine {
    fn redraw(&mut self, text: &str) {
        self.clear();
        self.drawn = self.term.write_line(text).is_ok();
    }

    fn clear(&mut self) {
        if self.drawn {
            let _ = self
                .term
                .move_cursor_up(1)
                .and_then(|_| self.term.clear_line());
            self.drawn = false;
        }
    }
}

/// Run `func` on another thread and return what it returns. If it's still
/// going after a couple of seconds and we're on a terminal, show
/// "<wait_message>: <elapsed>s" until it's done. A panic in `func` is
/// resumed on the calling thread.
pub(crate) fn expensive_op<F, R>(func: F, wait_message: &str) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    const QUIET_PERIOD: Duration = Duration::from_secs(2);
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    let started = Instant::now();
    thread::scope(|scope| {
        let handle = scope.spawn(func);

        let mut status = is_a_tty().then(|| StatusLine {
            term: Term::stderr(),
            drawn: false,
        });
        while !handle.is_finished() {
            thread::sleep(POLL_INTERVAL);
            let elapsed = started.elapsed();
            if let (Some(status), true) = (status.as_mut(), elapsed >= QUIET_PERIOD) {
                status.redraw(&format!("{wait_message}: {:.2}s", elapsed.as_secs_f64()));
            }
        }
        if let Some(status) = status.as_mut() {
            status.clear();
        }

        match handle.join() {
            Ok(r) => r,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expensive_op_returns_value() {
        let v = expensive_op(|| (1..=10).sum::<u32>(), "Still summing");
        assert_eq!(v, 55);
    }

    #[test]
    fn test_expensive_op_slow() {
        let v = expensive_op(
            || {
                thread::sleep(Duration::from_millis(300));
                "done"
            },
            "Still sleeping",
        );
        assert_eq!(v, "done");
    }

    #[test]
    fn test_expensive_op_borrows() {
        let words = vec!["sun".to_string(), "sep".to_string()];
        let joined = expensive_op(|| words.concat(), "Still joining");
        assert_eq!(joined, "sunsep");
        assert_eq!(words.len(), 2);
    }

    #[test]
    #[should_panic(expected = "couldn't finish")]
    fn test_expensive_op_panics_propagate() {
        expensive_op(|| -> u8 { panic!("couldn't finish") }, "Still failing");
    }
}
