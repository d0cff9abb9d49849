//! Single-line terminal surface.

use std::io::{self, Write};

use async_trait::async_trait;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::error::Result;
use crate::rotator::{DisplaySurface, Opacity};

/// Redraws the current terminal line on every change.
///
/// A terminal has no partial opacity: transparent clears the line and opaque
/// prints the stored text.
pub struct TerminalSurface<W> {
    out: W,
    text: String,
    opacity: Opacity,
    color: Color,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            text: String::new(),
            opacity: Opacity::Opaque,
            color: Color::Cyan,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;

        if self.opacity == Opacity::Opaque {
            queue!(
                self.out,
                SetForegroundColor(self.color),
                SetAttribute(Attribute::Bold),
                Print(&self.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }

        self.out.flush()
    }
}

#[async_trait]
impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    async fn set_opacity(&mut self, opacity: Opacity) -> Result<()> {
        self.opacity = opacity;
        self.redraw()?;
        Ok(())
    }

    async fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        // Hidden text is picked up by the next fade-in
        if self.opacity == Opacity::Opaque {
            self.redraw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotator::{MessageList, MessageRotator};

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_transparent_clears_without_text() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_opacity(Opacity::Transparent).await.unwrap();
        surface.set_text("hidden").await.unwrap();

        assert_eq!(surface.text(), "hidden");
        assert_eq!(surface.opacity(), Opacity::Transparent);
        assert!(!output(surface).contains("hidden"));
    }

    #[tokio::test]
    async fn test_fade_in_prints_text() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_opacity(Opacity::Transparent).await.unwrap();
        surface.set_text("shown").await.unwrap();
        surface.set_opacity(Opacity::Opaque).await.unwrap();

        assert!(output(surface).contains("shown"));
    }

    #[tokio::test]
    async fn test_rotation_redraws_line() {
        let surface = TerminalSurface::new(Vec::new());
        let mut rotator = MessageRotator::new(MessageList::default(), surface);
        rotator.rotate().await.unwrap();
        rotator.rotate().await.unwrap();

        let surface = rotator.into_surface();
        assert_eq!(surface.text(), "Find the perfect match for your skills");

        let out = output(surface);
        assert!(out.contains("Discover your dream job"));
        assert!(out.contains("Find the perfect match for your skills"));
        assert!(out.contains("\u{1b}["));
    }
}
