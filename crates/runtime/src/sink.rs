use tracing::trace;

use crate::variables::VariableCommand;

/// Write-only channel into the host's variable store.
///
/// Sends are fire-and-forget: the host applies the update and schedules the
/// next render on its own.
pub trait VariableSink {
    fn send(&mut self, command: VariableCommand);
}

impl<S: VariableSink + ?Sized> VariableSink for &mut S {
    fn send(&mut self, command: VariableCommand) {
        (**self).send(command);
    }
}

/// Sink that keeps every command, in send order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<VariableCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[VariableCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<VariableCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl VariableSink for RecordingSink {
    fn send(&mut self, command: VariableCommand) {
        trace!(?command, "variable write");
        self.commands.push(command);
    }
}
