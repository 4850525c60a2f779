use crate::config::Config;
use crate::dispose::{Disposable, Disposer};
use crate::host::Host;
use crate::session::{MotionSession, SessionOutcome};
use anyhow::{Result, bail};
use log::info;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The registered `<prefix>.execute` command and the session it is running.
pub struct Extension<H: Host + ?Sized> {
    host: Rc<H>,
    config: Rc<Config>,
    command_id: String,
    registered: Rc<Cell<bool>>,
    current: RefCell<Option<Disposer>>,
}

impl<H> Extension<H>
where
    H: Host + ?Sized + 'static,
{
    pub fn activate(host: Rc<H>, config: Config) -> Self {
        let command_id = config.command_id();
        let registered = Rc::new(Cell::new(true));

        host.subscriptions().add_fn(format!("command {command_id}"), {
            let command_id = command_id.clone();
            let registered = Rc::clone(&registered);
            move || {
                registered.set(false);
                info!("Unregistered {command_id}");
                Ok(())
            }
        });
        info!("Registered {command_id}");

        Self {
            host,
            config: Rc::new(config),
            command_id,
            registered,
            current: RefCell::new(None),
        }
    }

    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    pub fn is_registered(&self) -> bool {
        self.registered.get()
    }

    /// Runs one motion session for `command_id`, superseding any session
    /// that is still waiting for input.
    pub async fn execute(&self, command_id: &str) -> Result<SessionOutcome> {
        if command_id != self.command_id || !self.registered.get() {
            bail!("Command '{command_id}' not found");
        }

        if let Some(previous) = self.current.borrow_mut().take() {
            if !previous.is_disposed() {
                info!("Superseding the previous motion session");
                previous.dispose();
            }
        }

        let disposer = Disposer::attached(self.host.as_ref(), "motion session");
        *self.current.borrow_mut() = Some(disposer.clone());

        let session = MotionSession::new(Rc::clone(&self.host), Rc::clone(&self.config), disposer);
        Ok(session.run().await?)
    }

    /// Tears down everything registered with the host, including a running
    /// session.
    pub fn deactivate(&self) {
        self.host.subscriptions().dispose();
    }
}
