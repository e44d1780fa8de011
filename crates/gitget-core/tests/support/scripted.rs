use std::cell::RefCell;

use gitget_core::Result;
use gitget_core::git::{CommandOutcome, GitCommand, GitRunner};

type Responder = Box<dyn Fn(&GitCommand) -> CommandOutcome>;

/// Records every command and answers with a scripted outcome.
pub struct ScriptedGit {
    calls: RefCell<Vec<GitCommand>>,
    respond: Responder,
}

impl ScriptedGit {
    pub fn new(respond: impl Fn(&GitCommand) -> CommandOutcome + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every command succeeds.
    pub fn succeeding() -> Self {
        Self::new(|_| CommandOutcome::succeeded())
    }

    pub fn calls(&self) -> Vec<GitCommand> {
        self.calls.borrow().clone()
    }

    /// Argument lists of every recorded command.
    pub fn arg_lists(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .map(|cmd| cmd.args().to_vec())
            .collect()
    }
}

impl GitRunner for ScriptedGit {
    fn execute(&self, command: &GitCommand) -> Result<CommandOutcome> {
        self.calls.borrow_mut().push(command.clone());
        Ok((self.respond)(command))
    }
}

pub fn is_show_of(command: &GitCommand, revision: &str) -> bool {
    command.args().first().map(String::as_str) == Some("show")
        && command.args().iter().any(|arg| arg == revision)
}
