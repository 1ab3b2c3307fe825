use anyhow::{Context, Result};
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

const BELL: &[u8] = b"\x07";

/// Audible alert for a freshly displayed order.
///
/// Playback is fire-and-forget: callers log a failure and move on.
pub trait NotificationSink {
    fn play(&self) -> Result<()>;

    /// Frees whatever the sink holds for playback. Called once on teardown.
    fn release(&self) {}
}

/// Rings the terminal bell on the wrapped writer.
pub struct BellNotifier<W: Write> {
    out: Mutex<W>,
    rings: u8,
}

impl BellNotifier<Stdout> {
    pub fn stdout(rings: u8) -> Self {
        Self::new(io::stdout(), rings)
    }
}

impl<W: Write> BellNotifier<W> {
    pub fn new(out: W, rings: u8) -> Self {
        Self {
            out: Mutex::new(out),
            rings: rings.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> NotificationSink for BellNotifier<W> {
    fn play(&self) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("the bell writer is poisoned"))?;

        for _ in 0..self.rings {
            out.write_all(BELL).context("failed to ring the bell")?;
        }

        out.flush().context("failed to flush the bell")?;
        Ok(())
    }

    fn release(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}
