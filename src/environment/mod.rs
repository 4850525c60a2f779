//! Temporary changes to the editor that last for one session.
//!
//! Every function here takes the owning [`Disposer`] and registers the undo
//! step before returning.

mod highlight;

pub use highlight::DestinationHighlight;

use crate::dispose::Disposer;
use crate::host::{EditorOption, LineNumbers, Settings};
use anyhow::{Context, Result};
use log::debug;
use std::rc::Rc;

/// Sets `option` and registers a step that puts the previous value back.
///
/// Nothing is registered when the option already has the requested value.
pub fn override_option<S>(settings: &Rc<S>, disposer: &Disposer, option: EditorOption) -> Result<()>
where
    S: Settings + ?Sized + 'static,
{
    let previous = settings.option(option.kind());
    if previous == option {
        debug!("{} already set, nothing to override", option);
        return Ok(());
    }

    settings
        .set_option(option)
        .with_context(|| format!("Failed to set {option}"))?;
    debug!("Set {option} (was {previous})");

    let settings = Rc::clone(settings);
    disposer.add_fn(format!("restore {}", option.kind()), move || {
        debug!("Restoring {previous}");
        settings
            .set_option(previous)
            .with_context(|| format!("Failed to restore {previous}"))
    });
    Ok(())
}

pub fn enable_relative_lines<S>(settings: &Rc<S>, disposer: &Disposer) -> Result<()>
where
    S: Settings + ?Sized + 'static,
{
    override_option(
        settings,
        disposer,
        EditorOption::LineNumbers(LineNumbers::Relative),
    )
}

pub fn enable_scroll_padding<S>(settings: &Rc<S>, disposer: &Disposer, lines: u32) -> Result<()>
where
    S: Settings + ?Sized + 'static,
{
    override_option(
        settings,
        disposer,
        EditorOption::CursorSurroundingLines(lines),
    )
}
