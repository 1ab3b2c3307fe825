use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::errors::PrintError;
use crate::tickets::RenderedTicket;

pub trait PrintSink {
    fn print(&self, ticket: &RenderedTicket) -> Result<(), PrintError>;
}

/// Drops every ticket as an HTML file into a directory watched by the print daemon.
pub struct SpoolDirectoryPrinter {
    spool_dir: PathBuf,
}

impl SpoolDirectoryPrinter {
    pub fn new<P: AsRef<Path>>(spool_dir: P) -> Result<Self> {
        let spool_dir = spool_dir.as_ref().to_path_buf();

        fs::create_dir_all(&spool_dir).context(format!(
            "failed to create the ticket spool directory {}",
            spool_dir.display()
        ))?;

        Ok(Self { spool_dir })
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    fn ticket_path(&self, ticket: &RenderedTicket) -> PathBuf {
        let order_id: String = ticket
            .order_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();

        self.spool_dir.join(format!(
            "{}-{}.html",
            order_id,
            chrono::Utc::now().timestamp_millis()
        ))
    }
}

impl PrintSink for SpoolDirectoryPrinter {
    fn print(&self, ticket: &RenderedTicket) -> Result<(), PrintError> {
        let path = self.ticket_path(ticket);

        fs::write(&path, &ticket.html).map_err(|source| PrintError::Spool {
            order_id: ticket.order_id.clone(),
            source,
        })
    }
}
