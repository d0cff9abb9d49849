//! Message rotation for the landing page banner.
//!
//! A [`MessageRotator`] owns a fixed list of messages and an index into it.
//! Each cycle fades the surface out, swaps in the current message, advances
//! the index and fades back in. Timing lives in [`schedule`].

pub mod schedule;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RotatorError};

pub use schedule::{RotationHandle, RotationReport, Schedule};

/// Messages shown on the landing page when none are configured
pub const DEFAULT_MESSAGES: [&str; 3] = [
    "Discover your dream job",
    "Find the perfect match for your skills",
    "Unlock new career opportunities",
];

/// Element id of the banner on the landing page
pub const DEFAULT_ELEMENT_ID: &str = "rotating-text";

/// Opacity of a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opacity {
    Transparent,
    Opaque,
}

impl Opacity {
    /// CSS value for the `opacity` property
    pub fn as_css(&self) -> &'static str {
        match self {
            Opacity::Transparent => "0",
            Opacity::Opaque => "1",
        }
    }
}

/// A text-bearing element the rotator writes to.
///
/// The rotator only ever sets the text and the opacity. How a transition
/// between opacities looks is up to the surface.
#[async_trait]
pub trait DisplaySurface: Send {
    async fn set_opacity(&mut self, opacity: Opacity) -> Result<()>;

    async fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Ordered, non-empty list of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageList(Vec<String>);

impl MessageList {
    pub fn new<I, S>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Err(RotatorError::EmptyMessageList);
        }
        Ok(Self(messages))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed list
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for MessageList {
    fn default() -> Self {
        Self(DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect())
    }
}

/// Cycles a [`MessageList`] through a [`DisplaySurface`]
pub struct MessageRotator<S> {
    messages: MessageList,
    current_index: usize,
    surface: S,
}

impl<S: DisplaySurface> MessageRotator<S> {
    pub fn new(messages: MessageList, surface: S) -> Self {
        Self {
            messages,
            current_index: 0,
            surface,
        }
    }

    /// Index of the message the next cycle will show
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Run one full cycle with no pause between fade-out and swap
    pub async fn rotate(&mut self) -> Result<()> {
        self.fade_out().await?;
        self.apply_next().await
    }

    /// First half of a cycle: hide the surface
    pub async fn fade_out(&mut self) -> Result<()> {
        self.surface.set_opacity(Opacity::Transparent).await
    }

    /// Second half of a cycle: swap the text, advance, show the surface
    pub async fn apply_next(&mut self) -> Result<()> {
        let index = self.current_index;
        // Index is always reduced modulo len, and len >= 1
        let text = self.messages.0[index].clone();

        self.surface.set_text(&text).await?;
        self.current_index = (index + 1) % self.messages.len();
        self.surface.set_opacity(Opacity::Opaque).await?;

        debug!("Rotated to message {}: {}", index, text);
        Ok(())
    }
}
