//! JSON-lines surface, for piping rotations into other tools.

use std::io::{self, Write};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::SurfaceEvent;
use crate::error::Result;
use crate::rotator::{DisplaySurface, Opacity};

#[derive(Serialize)]
struct JsonLine<'a> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a SurfaceEvent,
}

/// Writes every surface mutation as one JSON object per line
pub struct JsonSurface<W> {
    out: W,
    element: String,
}

impl JsonSurface<io::Stdout> {
    pub fn stdout(element: &str) -> Self {
        Self::new(io::stdout(), element)
    }
}

impl<W: Write + Send> JsonSurface<W> {
    pub fn new(out: W, element: &str) -> Self {
        Self {
            out,
            element: element.to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: SurfaceEvent) -> Result<()> {
        let line = JsonLine {
            at: Utc::now(),
            event: &event,
        };
        serde_json::to_writer(&mut self.out, &line).map_err(io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> DisplaySurface for JsonSurface<W> {
    async fn set_opacity(&mut self, opacity: Opacity) -> Result<()> {
        let event = SurfaceEvent::opacity(&self.element, opacity);
        self.emit(event)
    }

    async fn set_text(&mut self, text: &str) -> Result<()> {
        let event = SurfaceEvent::text(&self.element, text);
        self.emit(event)
    }
}
