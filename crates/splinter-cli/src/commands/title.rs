use anyhow::{Context, Result};
use splinter_core::derive_title;
use std::io::Read;

fn read_selection(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read selection from stdin")?;
            Ok(buffer)
        }
    }
}

/// Print the derived title; `Ok(false)` when there is none
pub fn title(text: Option<String>) -> Result<bool> {
    match derive_title(&read_selection(text)?) {
        Some(title) => {
            println!("{title}");
            Ok(true)
        }
        None => {
            eprintln!("No usable title in selection");
            Ok(false)
        }
    }
}

/// Availability check without output
pub fn check(text: Option<String>) -> Result<bool> {
    Ok(derive_title(&read_selection(text)?).is_some())
}
