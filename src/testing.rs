//! In-memory host that records every interaction, for tests.

use crate::dispose::Disposer;
use crate::host::{
    CursorMove, DecorationId, Decorations, Editor, EditorOption, EditorState, InputBoxOptions,
    LineNumbers, Lifecycle, OptionKind, Position, Selection, Settings, Window,
};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

/// How a scripted input box closes.
#[derive(Debug, Clone)]
pub enum InputEnd {
    /// Submit whatever was typed last.
    Submit,
    Dismiss,
    /// Submit this text without running the validator on it.
    SubmitUnchecked(String),
    /// Never close.
    Pending,
}

struct InputScript {
    edits: Vec<String>,
    end: InputEnd,
}

pub struct FakeHost {
    editor: Cell<Option<EditorState>>,
    options: RefCell<HashMap<OptionKind, EditorOption>>,
    highlights: RefCell<Vec<(DecorationId, usize)>>,
    next_decoration: Cell<u64>,
    scripts: RefCell<VecDeque<InputScript>>,
    feedback: RefCell<Vec<(String, Option<String>)>>,
    moves: RefCell<Vec<CursorMove>>,
    events: RefCell<Vec<String>>,
    on_input: RefCell<Option<Box<dyn Fn()>>>,
    fail_settings: Cell<bool>,
    fail_move: Cell<bool>,
    subscriptions: Disposer,
}

impl FakeHost {
    /// A 100 line document with the cursor on the first line.
    pub fn new() -> Self {
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
            editor: Cell::new(Some(EditorState {
                cursor: Position::default(),
                selection: Selection::default(),
                line_count: 100,
            })),
            options: RefCell::new(options),
            highlights: RefCell::new(Vec::new()),
            next_decoration: Cell::new(0),
            scripts: RefCell::new(VecDeque::new()),
            feedback: RefCell::new(Vec::new()),
            moves: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            on_input: RefCell::new(None),
            fail_settings: Cell::new(false),
            fail_move: Cell::new(false),
            subscriptions: Disposer::root("host subscriptions"),
        }
    }

    pub fn set_editor(&self, editor: Option<EditorState>) {
        self.editor.set(editor);
    }

    pub fn set_cursor(&self, line: usize) {
        if let Some(mut editor) = self.editor.get() {
            editor.cursor = Position::new(line, 0);
            editor.selection = Selection::caret(editor.cursor);
            self.editor.set(Some(editor));
        }
    }

    /// Queues the edits and close action for the next input box.
    pub fn script_input(&self, edits: &[&str], end: InputEnd) {
        self.scripts.borrow_mut().push_back(InputScript {
            edits: edits.iter().map(|s| s.to_string()).collect(),
            end,
        });
    }

    /// Runs while the input box is open, after the scripted edits.
    pub fn on_input(&self, hook: impl Fn() + 'static) {
        *self.on_input.borrow_mut() = Some(Box::new(hook));
    }

    pub fn fail_settings(&self) {
        self.fail_settings.set(true);
    }

    pub fn fail_move(&self) {
        self.fail_move.set(true);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn feedback(&self) -> Vec<(String, Option<String>)> {
        self.feedback.borrow().clone()
    }

    pub fn moves(&self) -> Vec<CursorMove> {
        self.moves.borrow().clone()
    }

    pub fn highlighted_lines(&self) -> Vec<usize> {
        self.highlights.borrow().iter().map(|(_, line)| *line).collect()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }
}

#[async_trait(?Send)]
impl Editor for FakeHost {
    fn active_editor(&self) -> Option<EditorState> {
        self.editor.get()
    }

    async fn move_cursor(&self, movement: CursorMove) -> Result<()> {
        if self.fail_move.get() {
            bail!("cursorMove is not available");
        }
        self.record(format!("move {} {}", movement.to, movement.value));
        self.moves.borrow_mut().push(movement);
        Ok(())
    }
}

impl Decorations for FakeHost {
    fn highlight_line(&self, line: usize) -> Result<DecorationId> {
        let id = DecorationId(self.next_decoration.get());
        self.next_decoration.set(id.0 + 1);
        self.highlights.borrow_mut().push((id, line));
        self.record(format!("highlight {line}"));
        Ok(id)
    }

    fn remove_highlight(&self, id: DecorationId) -> Result<()> {
        let mut highlights = self.highlights.borrow_mut();
        let index = highlights
            .iter()
            .position(|(other, _)| *other == id)
            .ok_or_else(|| anyhow!("unknown decoration {id:?}"))?;
        let (_, line) = highlights.remove(index);
        drop(highlights);
        self.record(format!("unhighlight {line}"));
        Ok(())
    }
}

#[async_trait(?Send)]
impl Window for FakeHost {
    async fn show_input_box(&self, options: InputBoxOptions<'_>) -> Option<String> {
        let script = self.scripts.borrow_mut().pop_front();
        let Some(script) = script else {
            return None;
        };

        self.record("input box open");
        for edit in &script.edits {
            let message = (options.validate)(edit.as_str());
            self.feedback.borrow_mut().push((edit.clone(), message));
        }

        if let Some(hook) = self.on_input.borrow().as_ref() {
            hook();
        }

        let result = match script.end {
            InputEnd::Submit => Some(script.edits.last().cloned().unwrap_or_default()),
            InputEnd::Dismiss => None,
            InputEnd::SubmitUnchecked(text) => Some(text),
            InputEnd::Pending => {
                futures::future::pending::<()>().await;
                None
            }
        };
        self.record("input box closed");
        result
    }

    fn show_error_message(&self, message: &str) {
        self.record(format!("error: {message}"));
    }
}

impl Settings for FakeHost {
    fn option(&self, kind: OptionKind) -> EditorOption {
        self.options.borrow()[&kind]
    }

    fn set_option(&self, option: EditorOption) -> Result<()> {
        if self.fail_settings.get() {
            bail!("settings are read-only");
        }
        self.options.borrow_mut().insert(option.kind(), option);
        self.record(format!("set {option}"));
        Ok(())
    }
}

impl Lifecycle for FakeHost {
    fn subscriptions(&self) -> &Disposer {
        &self.subscriptions
    }
}
