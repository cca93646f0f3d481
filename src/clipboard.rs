//! Clipboard access for text fields.
//
//! `SystemClipboard` goes through `arboard`; `MemoryClipboard` keeps the
//! text in process for headless runs and tests.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

pub trait Clipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard. The backend handle is opened lazily and kept for
/// the lifetime of the value.
#[derive(Default)]
pub struct SystemClipboard {
    backend: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn backend(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.backend.is_none() {
            self.backend = Some(arboard::Clipboard::new()?);
        }
        match self.backend.as_mut() {
            Some(backend) => Ok(backend),
            None => Err(ClipboardError::Backend(arboard::Error::ClipboardNotSupported)),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.backend()?.get_text().map_err(ClipboardError::from)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.backend()?
            .set_text(text.to_owned())
            .map_err(ClipboardError::from)
    }
}

/// Try to create a clipboard instance to detect availability.
pub fn available() -> bool {
    arboard::Clipboard::new().is_ok()
}

/// In-process clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.text.borrow().clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.text.borrow_mut() = text.to_owned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_clones_share_contents() {
        let mut clipboard = MemoryClipboard::new();
        let probe = clipboard.clone();
        clipboard.set_text("hello").unwrap();
        assert_eq!(probe.contents(), "hello");
        assert_eq!(clipboard.get_text().unwrap(), "hello");
    }
}
