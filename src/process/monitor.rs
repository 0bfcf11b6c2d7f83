//! Operator console role.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde::Serialize;

use crate::core::{Pool, PoolError};
use crate::process::Role;

/// Message printed when the monitor stops.
pub const TERMINATION_MESSAGE: &str = "The simulation has terminated.";

/// A single-character operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// `p` / `P`: print the state of every bay.
    Print,
    /// `q` / `Q`: end the simulation.
    Quit,
}

impl MonitorCommand {
    /// Decode a command character. Anything unknown is ignored.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'p' | 'P' => Some(Self::Print),
            'q' | 'Q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Why the monitor returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorExit {
    /// The operator typed `q`.
    Quit,
    /// Input was closed.
    EndOfInput,
}

/// Reads commands from `input` and writes snapshots to `out`.
///
/// Input is line-buffered; every non-whitespace byte of a line is one
/// command, so `pq` prints a snapshot and then quits. Bytes need not be
/// valid UTF-8; anything that is not a command is ignored.
pub struct MonitorProcess<R, W> {
    pool: Arc<Pool>,
    input: R,
    out: W,
    snapshots: usize,
}

impl<R: BufRead, W: Write> MonitorProcess<R, W> {
    /// Create a monitor over `pool`.
    pub const fn new(pool: Arc<Pool>, input: R, out: W) -> Self {
        Self {
            pool,
            input,
            out,
            snapshots: 0,
        }
    }

    /// Snapshots printed so far.
    #[must_use]
    pub const fn snapshots_printed(&self) -> usize {
        self.snapshots
    }

    /// Apply one command. Returns `true` if the monitor should stop.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Io`] if writing to the output fails.
    pub fn handle(&mut self, command: MonitorCommand) -> Result<bool, PoolError> {
        match command {
            MonitorCommand::Print => {
                let snapshot = self.pool.snapshot();
                write!(self.out, "{snapshot}")?;
                self.out.flush()?;
                self.snapshots += 1;
                tracing::debug!(occupied = snapshot.occupied(), "snapshot printed");
                Ok(false)
            }
            MonitorCommand::Quit => Ok(true),
        }
    }

    /// Process commands until `q` or end of input, then print the
    /// termination message.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Io`] if reading input or writing output fails.
    pub fn run(mut self) -> Result<MonitorExit, PoolError> {
        tracing::info!(role = %Role::Monitor, "role started");
        let mut line = Vec::new();
        let exit = loop {
            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                break MonitorExit::EndOfInput;
            }
            let mut quit = false;
            for command in line
                .iter()
                .filter(|b| !b.is_ascii_whitespace())
                .filter_map(|&b| MonitorCommand::from_char(char::from(b)))
            {
                if self.handle(command)? {
                    quit = true;
                    break;
                }
            }
            if quit {
                break MonitorExit::Quit;
            }
        };
        writeln!(self.out, "\n{TERMINATION_MESSAGE}")?;
        self.out.flush()?;
        tracing::info!(role = %Role::Monitor, ?exit, snapshots = self.snapshots, "role stopped");
        Ok(exit)
    }
}
