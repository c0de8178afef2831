use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Clipboard is not available")?;
    clipboard
        .set_text(text)
        .context("Failed to write to the clipboard")?;
    Ok(())
}

/// Current clipboard text, trimmed.
pub fn read_clipboard() -> Result<String> {
    let mut clipboard = Clipboard::new().context("Clipboard is not available")?;
    let text = clipboard
        .get_text()
        .context("Clipboard does not hold any text")?;
    Ok(text.trim().to_string())
}
