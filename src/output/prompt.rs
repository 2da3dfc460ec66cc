use crate::core::ConfirmGate;
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Yes/no prompt on the controlling terminal. Defaults to "no".
///
/// A non-interactive stdin (pipes, CI) always answers "no" so nothing is
/// deleted without an explicit `--no-interactive`.
pub struct TerminalConfirm;

impl ConfirmGate for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !std::io::stdin().is_terminal() {
            return false;
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
