//! A small crossterm host: a read-only document view with a one-line input
//! box at the bottom of the screen.

mod context;
mod document;

pub use context::TerminalContext;
pub use document::Document;

use crate::dispose::Disposer;
use crate::host::{
    CursorMove, DecorationId, Decorations, Editor, EditorOption, EditorState, InputBoxOptions,
    LineNumbers, Lifecycle, OptionKind, Selection, Settings, Window,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::{QueueableCommand, cursor, terminal};
use futures::StreamExt;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;

/// Rows at the bottom used by the input box and the message line.
const RESERVED_ROW_COUNT: usize = 2;
const MIN_GUTTER_WIDTH: usize = 4;

/// What a key press in the document view asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ExecuteMotion,
    Quit,
    None,
}

struct InputLine<'a> {
    prompt: &'a str,
    placeholder: &'a str,
    text: &'a str,
    feedback: Option<&'a str>,
}

pub struct TerminalHost {
    context: RefCell<TerminalContext>,
    document: RefCell<Document>,
    top_line: Cell<usize>,
    options: RefCell<HashMap<OptionKind, EditorOption>>,
    highlights: RefCell<Vec<(DecorationId, usize)>>,
    next_decoration: Cell<u64>,
    message: RefCell<Option<String>>,
    subscriptions: Disposer,
}

impl TerminalHost {
    pub fn new(context: TerminalContext, document: Document) -> Self {
        let options = HashMap::from([
            (
                OptionKind::LineNumbers,
                EditorOption::LineNumbers(LineNumbers::Absolute),
            ),
            (
                OptionKind::CursorSurroundingLines,
                EditorOption::CursorSurroundingLines(0),
            ),
        ]);

        Self {
            context: RefCell::new(context),
            document: RefCell::new(document),
            top_line: Cell::new(0),
            options: RefCell::new(options),
            highlights: RefCell::new(Vec::new()),
            next_decoration: Cell::new(0),
            message: RefCell::new(None),
            subscriptions: Disposer::root("terminal host"),
        }
    }

    /// Waits for the next key press in the document view.
    pub async fn next_action(&self) -> Result<ViewAction> {
        // one stream at a time, the input box opens its own
        let mut events = EventStream::new();
        self.render(None)?;
        loop {
            let Some(event) = events.next().await else {
                return Ok(ViewAction::Quit);
            };
            match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.message.borrow_mut().take();
                    return Ok(match key.code {
                        KeyCode::Char('q') => ViewAction::Quit,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            ViewAction::Quit
                        }
                        KeyCode::Char(':') | KeyCode::Char(' ') => ViewAction::ExecuteMotion,
                        _ => ViewAction::None,
                    });
                }
                Event::Resize(width, height) => {
                    self.context
                        .borrow_mut()
                        .resize(width as usize, height as usize)?;
                    self.render(None)?;
                }
                _ => {}
            }
        }
    }

    pub fn show_info(&self, message: impl Into<String>) {
        *self.message.borrow_mut() = Some(message.into());
    }

    pub fn cleanup(&self) -> Result<()> {
        self.context.borrow_mut().cleanup()
    }

    fn line_numbers(&self) -> LineNumbers {
        match self.option(OptionKind::LineNumbers) {
            EditorOption::LineNumbers(mode) => mode,
            _ => LineNumbers::Absolute,
        }
    }

    fn surrounding_lines(&self) -> usize {
        match self.option(OptionKind::CursorSurroundingLines) {
            EditorOption::CursorSurroundingLines(lines) => lines as usize,
            _ => 0,
        }
    }

    /// Keeps the cursor inside the view with the configured padding.
    fn scroll_to_cursor(&self, height: usize, cursor_line: usize, line_count: usize) -> usize {
        let padding = self.surrounding_lines().min(height.saturating_sub(1) / 2);
        let mut top = self.top_line.get();

        if cursor_line < top + padding {
            top = cursor_line.saturating_sub(padding);
        } else if cursor_line + padding >= top + height {
            top = cursor_line + padding + 1 - height;
        }
        top = top.min(line_count.saturating_sub(height));

        self.top_line.set(top);
        top
    }

    fn gutter_label(mode: LineNumbers, line: usize, cursor_line: usize) -> Option<String> {
        match mode {
            LineNumbers::Off => None,
            LineNumbers::Absolute => Some((line + 1).to_string()),
            LineNumbers::Relative if line == cursor_line => Some((line + 1).to_string()),
            LineNumbers::Relative => Some(line.abs_diff(cursor_line).to_string()),
        }
    }

    fn render(&self, input: Option<&InputLine<'_>>) -> Result<()> {
        let mut context = self.context.borrow_mut();
        let document = self.document.borrow();
        let (width, height) = (context.width, context.height);
        let view_height = height.saturating_sub(RESERVED_ROW_COUNT);

        let cursor = document.cursor();
        let line_count = document.line_count();
        let top = self.scroll_to_cursor(view_height, cursor.line, line_count);
        let mode = self.line_numbers();
        let gutter_width = match mode {
            LineNumbers::Off => 0,
            _ => (line_count.to_string().len() + 1).max(MIN_GUTTER_WIDTH),
        };
        let highlighted: Vec<usize> = self.highlights.borrow().iter().map(|(_, l)| *l).collect();

        let stdout = &mut context.stdout;
        stdout.queue(cursor::Hide)?;
        for row in 0..view_height {
            stdout
                .queue(cursor::MoveTo(0, row as u16))?
                .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;

            let line = top + row;
            let Some(text) = document.lines().get(line) else {
                stdout.queue(Print("~"))?;
                continue;
            };

            if let Some(label) = Self::gutter_label(mode, line, cursor.line) {
                let label = format!("{label:>w$} ", w = gutter_width - 1);
                stdout.queue(PrintStyledContent(label.dark_grey()))?;
            }

            let visible: String = text.chars().take(width.saturating_sub(gutter_width)).collect();
            if highlighted.contains(&line) {
                let padded = format!("{visible:<w$}", w = width.saturating_sub(gutter_width));
                stdout.queue(PrintStyledContent(padded.reverse()))?;
            } else {
                stdout.queue(Print(visible))?;
            }
        }

        let input_row = view_height as u16;
        let message_row = input_row + 1;
        stdout
            .queue(cursor::MoveTo(0, input_row))?
            .queue(terminal::Clear(terminal::ClearType::CurrentLine))?
            .queue(cursor::MoveTo(0, message_row))?
            .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;

        match input {
            Some(input) => {
                stdout
                    .queue(cursor::MoveTo(0, message_row))?
                    .queue(PrintStyledContent(input.prompt.bold()))?;
                if let Some(feedback) = input.feedback {
                    stdout.queue(PrintStyledContent(format!("  {feedback}").red()))?;
                }

                stdout.queue(cursor::MoveTo(0, input_row))?.queue(Print("> "))?;
                if input.text.is_empty() {
                    stdout
                        .queue(PrintStyledContent(input.placeholder.dark_grey()))?
                        .queue(cursor::MoveTo(2, input_row))?;
                } else {
                    stdout.queue(Print(input.text))?;
                }
            }
            None => {
                if let Some(message) = self.message.borrow().as_deref() {
                    stdout
                        .queue(cursor::MoveTo(0, message_row))?
                        .queue(Print(message))?;
                }
                let screen_row = cursor.line.saturating_sub(top);
                stdout.queue(cursor::MoveTo(
                    (gutter_width + cursor.column) as u16,
                    screen_row as u16,
                ))?;
            }
        }

        stdout.queue(cursor::Show)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_input(&self, options: &InputBoxOptions<'_>, text: &str, feedback: Option<&str>) {
        let line = InputLine {
            prompt: options.prompt,
            placeholder: options.placeholder,
            text,
            feedback,
        };
        if let Err(e) = self.render(Some(&line)) {
            warn!("Failed to draw input box: {e:#}");
        }
    }
}

#[async_trait(?Send)]
impl Editor for TerminalHost {
    fn active_editor(&self) -> Option<EditorState> {
        let document = self.document.borrow();
        Some(EditorState {
            cursor: document.cursor(),
            selection: Selection::caret(document.cursor()),
            line_count: document.line_count(),
        })
    }

    async fn move_cursor(&self, movement: CursorMove) -> Result<()> {
        self.document.borrow_mut().move_cursor(movement);
        self.render(None)
    }
}

impl Decorations for TerminalHost {
    fn highlight_line(&self, line: usize) -> Result<DecorationId> {
        let id = DecorationId(self.next_decoration.get());
        self.next_decoration.set(id.0 + 1);
        self.highlights.borrow_mut().push((id, line));
        Ok(id)
    }

    fn remove_highlight(&self, id: DecorationId) -> Result<()> {
        let mut highlights = self.highlights.borrow_mut();
        let index = highlights
            .iter()
            .position(|(other, _)| *other == id)
            .ok_or_else(|| anyhow!("Unknown decoration {id:?}"))?;
        highlights.remove(index);
        Ok(())
    }
}

#[async_trait(?Send)]
impl Window for TerminalHost {
    async fn show_input_box(&self, options: InputBoxOptions<'_>) -> Option<String> {
        let mut events = EventStream::new();
        let mut text = String::new();
        let mut feedback = (options.validate)(text.as_str());
        // the empty box should not start out red
        self.render_input(&options, &text, None);

        loop {
            let event = match events.next().await {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    warn!("Error reading event: {e}");
                    return None;
                }
                None => return None,
            };

            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event
            else {
                continue;
            };

            match code {
                KeyCode::Enter => {
                    if text.is_empty() || feedback.is_none() {
                        return Some(text);
                    }
                    // invalid text stays in the box, like an inline error would
                    debug!("Ignoring submit of invalid motion {text:?}");
                    continue;
                }
                KeyCode::Esc => return None,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return None,
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Char(c) => text.push(c),
                _ => continue,
            }

            feedback = (options.validate)(text.as_str());
            self.render_input(&options, &text, feedback.as_deref());
        }
    }

    fn show_error_message(&self, message: &str) {
        self.show_info(message);
    }
}

impl Settings for TerminalHost {
    fn option(&self, kind: OptionKind) -> EditorOption {
        match self.options.borrow().get(&kind) {
            Some(option) => *option,
            None => match kind {
                OptionKind::LineNumbers => EditorOption::LineNumbers(LineNumbers::Absolute),
                OptionKind::CursorSurroundingLines => EditorOption::CursorSurroundingLines(0),
            },
        }
    }

    fn set_option(&self, option: EditorOption) -> Result<()> {
        self.options.borrow_mut().insert(option.kind(), option);
        Ok(())
    }
}

impl Lifecycle for TerminalHost {
    fn subscriptions(&self) -> &Disposer {
        &self.subscriptions
    }
}
