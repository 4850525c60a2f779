//! One interactive motion-entry episode.
//!
//! A session checks the editor, switches on its temporary environment,
//! validates every edit of the input box and, once the box closes, restores
//! the environment before moving the cursor.

mod state;

pub use state::{AbortReason, SessionError, SessionOutcome, SessionState};

use crate::config::Config;
use crate::constants::input_box;
use crate::dispose::{Disposable, Disposer, with_existing_disposer};
use crate::environment::{self, DestinationHighlight};
use crate::host::{CursorMove, EditorState, Host, InputBoxOptions};
use crate::motion::{Motion, MotionGrammar, MotionParseError};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct MotionSession<H: Host + ?Sized> {
    host: Rc<H>,
    config: Rc<Config>,
    grammar: MotionGrammar,
    disposer: Disposer,
    highlight: Option<DestinationHighlight<H>>,
    state: Cell<SessionState>,
    origin: Cell<Option<EditorState>>,
    pending_input: RefCell<String>,
    last_validation: RefCell<Option<Result<Motion, MotionParseError>>>,
}

impl<H> MotionSession<H>
where
    H: Host + ?Sized + 'static,
{
    /// `disposer` owns everything the session acquires and is disposed when
    /// the session ends.
    pub fn new(host: Rc<H>, config: Rc<Config>, disposer: Disposer) -> Self {
        let highlight = config
            .highlight_destination
            .then(|| DestinationHighlight::new(Rc::clone(&host), disposer.clone()));

        Self {
            grammar: config.grammar(),
            host,
            config,
            disposer,
            highlight,
            state: Cell::new(SessionState::Starting),
            origin: Cell::new(None),
            pending_input: RefCell::new(String::new()),
            last_validation: RefCell::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn disposer(&self) -> &Disposer {
        &self.disposer
    }

    pub fn pending_input(&self) -> String {
        self.pending_input.borrow().clone()
    }

    pub fn last_validation(&self) -> Option<Result<Motion, MotionParseError>> {
        self.last_validation.borrow().clone()
    }

    pub async fn run(&self) -> Result<SessionOutcome, SessionError> {
        info!("Starting motion session");
        let result = self.run_to_end().await;
        // covers the paths that never reached the scoped part
        self.disposer.dispose();

        match &result {
            Ok(outcome) => info!("Motion session finished: {outcome:?}"),
            Err(e) => warn!("Motion session failed: {e}"),
        }
        result
    }

    async fn run_to_end(&self) -> Result<SessionOutcome, SessionError> {
        let editor = match self.check_preconditions() {
            Ok(editor) => editor,
            Err(reason) => {
                self.host.show_error_message(reason.message());
                self.state.set(SessionState::Aborted);
                return Ok(SessionOutcome::Aborted(reason));
            }
        };

        let input = with_existing_disposer(&self.disposer, |disposer| {
            self.collect_input(disposer, editor)
        })
        .await
        .inspect_err(|_| self.state.set(SessionState::Aborted))?;

        self.finish(input).await
    }

    fn check_preconditions(&self) -> Result<EditorState, AbortReason> {
        let editor = self
            .host
            .active_editor()
            .ok_or(AbortReason::NoActiveEditor)?;
        if !editor.selection.is_empty() {
            return Err(AbortReason::SelectionNotEmpty);
        }
        Ok(editor)
    }

    async fn collect_input(
        &self,
        disposer: Disposer,
        editor: EditorState,
    ) -> Result<Option<String>, SessionError> {
        self.acquire_environment(&disposer)?;
        self.origin.set(Some(editor));
        self.state.set(SessionState::AwaitingInput);

        let validate = |text: &str| self.validate(text);
        let input = self
            .host
            .show_input_box(InputBoxOptions {
                prompt: input_box::PROMPT,
                placeholder: input_box::PLACEHOLDER,
                validate: &validate,
            })
            .await;

        if disposer.is_disposed() {
            debug!("Session was torn down while waiting for input");
            return Ok(None);
        }
        Ok(input)
    }

    fn acquire_environment(&self, disposer: &Disposer) -> anyhow::Result<()> {
        if self.config.relative_line_numbers {
            environment::enable_relative_lines(&self.host, disposer)?;
        }
        if let Some(lines) = self.config.scroll_padding {
            environment::enable_scroll_padding(&self.host, disposer, lines)?;
        }
        Ok(())
    }

    /// Live feedback for the input box. `None` means `input` is a valid motion.
    pub fn validate(&self, input: &str) -> Option<String> {
        self.state.set(SessionState::Validating);

        let result = self.grammar.parse(input);
        self.show_destination(&result);
        let feedback = result.as_ref().err().map(ToString::to_string);

        *self.pending_input.borrow_mut() = input.to_string();
        *self.last_validation.borrow_mut() = Some(result);
        self.state.set(SessionState::AwaitingInput);
        feedback
    }

    fn show_destination(&self, result: &Result<Motion, MotionParseError>) {
        let (Some(highlight), Some(origin)) = (&self.highlight, self.origin.get()) else {
            return;
        };

        match result {
            Ok(motion) => {
                let line = motion.destination_line(origin.cursor.line, origin.line_count);
                if let Err(e) = highlight.show(line) {
                    warn!("Failed to highlight destination: {e:#}");
                }
            }
            Err(_) => highlight.clear(),
        }
    }

    async fn finish(&self, input: Option<String>) -> Result<SessionOutcome, SessionError> {
        let Some(input) = input.filter(|text| !text.is_empty()) else {
            self.state.set(SessionState::Cancelled);
            return Ok(SessionOutcome::Cancelled);
        };

        let motion = match self.grammar.parse(&input) {
            Ok(motion) => motion,
            Err(source) => {
                self.state.set(SessionState::Aborted);
                return Err(SessionError::Invariant { input, source });
            }
        };

        info!("Moving {motion}");
        if let Err(e) = self.host.move_cursor(CursorMove::from(&motion)).await {
            self.state.set(SessionState::Aborted);
            return Err(SessionError::Host(e));
        }

        self.state.set(SessionState::Confirmed);
        Ok(SessionOutcome::Confirmed(motion))
    }
}
