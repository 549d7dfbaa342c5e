//! Command registration and dispatch.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::Rc,
};

use futures::future::LocalBoxFuture;
use terminal_shell_contract::{
    CommandContext, CommandDescriptor, CommandResult, CommandVisibility,
};

/// Fixed reply for `exit` and `quit`.
pub const EXIT_MESSAGE: &str = "There's nowhere to go. You're already home.";

/// Arguments handed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Descriptor of the resolved command.
    pub descriptor: CommandDescriptor,
    /// Name or alias as typed, lowercased.
    pub invoked_as: String,
    /// Whitespace-separated arguments after the command name.
    pub args: Vec<String>,
    /// Read-only snapshot of host state.
    pub context: CommandContext,
}

/// Result of invoking a handler.
pub enum CommandOutcome {
    /// Completed synchronously.
    Ready(CommandResult),
    /// Completes later; the host drives the future.
    Pending(LocalBoxFuture<'static, CommandResult>),
}

impl fmt::Debug for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<CommandResult> for CommandOutcome {
    fn from(result: CommandResult) -> Self {
        Self::Ready(result)
    }
}

/// Command handler.
pub type CommandHandler = Rc<dyn Fn(CommandInvocation) -> CommandOutcome>;

/// Registration token returned by [`CommandRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandRegistrationToken(pub u64);

#[derive(Clone)]
struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: CommandHandler,
}

#[derive(Default)]
struct RegistryState {
    next_token: u64,
    by_token: BTreeMap<CommandRegistrationToken, RegisteredCommand>,
}

/// Shared command registry.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one command and returns its registration token.
    ///
    /// A later registration with the same name or alias shadows the earlier one.
    pub fn register(
        &self,
        descriptor: CommandDescriptor,
        handler: CommandHandler,
    ) -> CommandRegistrationToken {
        let mut state = self.state.borrow_mut();
        state.next_token = state.next_token.saturating_add(1);
        let token = CommandRegistrationToken(state.next_token);
        state
            .by_token
            .insert(token, RegisteredCommand { descriptor, handler });
        token
    }

    /// Registers a command and ties its lifetime to the returned handle.
    pub fn register_scoped(
        &self,
        descriptor: CommandDescriptor,
        handler: CommandHandler,
    ) -> CommandRegistryHandle {
        let token = self.register(descriptor, handler);
        CommandRegistryHandle {
            registry: self.clone(),
            token,
            active: Rc::new(Cell::new(true)),
        }
    }

    /// Removes a previously registered command token.
    pub fn unregister(&self, token: CommandRegistrationToken) {
        self.state.borrow_mut().by_token.remove(&token);
    }

    /// Returns the currently registered descriptors in registration order.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.state
            .borrow()
            .by_token
            .values()
            .map(|registered| registered.descriptor.clone())
            .collect()
    }

    fn names(&self) -> Vec<String> {
        self.descriptors()
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect()
    }

    /// Public command names starting with `prefix`, sorted.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut names = self
            .descriptors()
            .into_iter()
            .filter(|descriptor| descriptor.visibility == CommandVisibility::Public)
            .map(|descriptor| descriptor.name)
            .filter(|name| name.starts_with(&prefix))
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        names
    }

    fn resolve(&self, name: &str) -> Option<RegisteredCommand> {
        let state = self.state.borrow();
        state
            .by_token
            .values()
            .rev()
            .find(|registered| registered.descriptor.name == name)
            .or_else(|| {
                state.by_token.values().rev().find(|registered| {
                    registered
                        .descriptor
                        .aliases
                        .iter()
                        .any(|alias| alias == name)
                })
            })
            .cloned()
    }

    /// Parses and runs one raw input line.
    ///
    /// Never fails: unknown commands produce an error result with a hint.
    pub fn execute(&self, raw: &str, context: CommandContext) -> CommandOutcome {
        let mut tokens = raw.split_whitespace();
        let Some(first) = tokens.next() else {
            return CommandResult::empty().into();
        };
        let name = first.to_lowercase();
        let args = tokens.map(str::to_string).collect::<Vec<_>>();

        if name == "exit" || name == "quit" {
            return CommandResult::text(EXIT_MESSAGE).into();
        }

        let Some(registered) = self.resolve(&name) else {
            return CommandResult::error(format!(
                "Command not found: {name}\n\nType 'help' for available commands."
            ))
            .into();
        };

        (registered.handler)(CommandInvocation {
            descriptor: registered.descriptor,
            invoked_as: name,
            args,
            context,
        })
    }
}

/// Drop-based registration handle.
#[derive(Clone)]
pub struct CommandRegistryHandle {
    registry: CommandRegistry,
    token: CommandRegistrationToken,
    active: Rc<Cell<bool>>,
}

impl CommandRegistryHandle {
    /// Registration token.
    pub fn token(&self) -> CommandRegistrationToken {
        self.token
    }

    /// Unregisters the command if it is still active.
    pub fn unregister(&self) {
        if self.active.replace(false) {
            self.registry.unregister(self.token);
        }
    }
}

impl Drop for CommandRegistryHandle {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_shell_contract::CommandGroup;

    fn echo_handler() -> CommandHandler {
        Rc::new(|invocation: CommandInvocation| {
            CommandOutcome::Ready(CommandResult::text(format!(
                "{}:{}",
                invocation.descriptor.name,
                invocation.args.join(",")
            )))
        })
    }

    fn ready(outcome: CommandOutcome) -> CommandResult {
        match outcome {
            CommandOutcome::Ready(result) => result,
            CommandOutcome::Pending(future) => futures::executor::block_on(future),
        }
    }

    fn registry() -> CommandRegistry {
        let registry = CommandRegistry::new();
        registry.register(
            CommandDescriptor::new("open", "Open a project", CommandGroup::Navigation)
                .with_alias("ls"),
            echo_handler(),
        );
        registry.register(
            CommandDescriptor::new("help", "Show help", CommandGroup::Navigation),
            echo_handler(),
        );
        registry.register(
            CommandDescriptor::new("history", "Toggle history", CommandGroup::System),
            echo_handler(),
        );
        registry.register(
            CommandDescriptor::new("secret", "Hidden", CommandGroup::System).hidden(),
            echo_handler(),
        );
        registry
    }

    #[test]
    fn empty_input_is_noop() {
        let result = ready(registry().execute("   ", CommandContext::default()));
        assert_eq!(result, CommandResult::empty());
    }

    #[test]
    fn parses_lowercased_name_and_args() {
        let result = ready(registry().execute("  OPEN koi  pond ", CommandContext::default()));
        assert_eq!(result.output, "open:koi,pond");
    }

    #[test]
    fn alias_resolves_to_target_handler() {
        let result = ready(registry().execute("ls", CommandContext::default()));
        assert_eq!(result.output, "open:");
    }

    #[test]
    fn unknown_command_is_recoverable_error() {
        let result = ready(registry().execute("foobar", CommandContext::default()));
        assert!(result.is_error);
        assert_eq!(result.action, None);
        assert_eq!(
            result.output,
            "Command not found: foobar\n\nType 'help' for available commands."
        );
    }

    #[test]
    fn exit_and_quit_change_nothing() {
        for line in ["exit", "QUIT now"] {
            let result = ready(registry().execute(line, CommandContext::default()));
            assert_eq!(result, CommandResult::text(EXIT_MESSAGE));
        }
    }

    #[test]
    fn completion_skips_hidden_commands() {
        let registry = registry();
        assert_eq!(registry.complete("h"), vec!["help", "history"]);
        assert_eq!(registry.complete("se"), Vec::<String>::new());
        assert_eq!(registry.complete("OP"), vec!["open"]);
    }

    #[test]
    fn scoped_handle_unregisters_on_drop() {
        let registry = CommandRegistry::new();
        {
            let _handle = registry.register_scoped(
                CommandDescriptor::new("snake", "Play Snake", CommandGroup::Games),
                echo_handler(),
            );
            assert_eq!(registry.complete("sn"), vec!["snake"]);
        }
        assert!(registry.descriptors().is_empty());
        assert!(ready(registry.execute("snake", CommandContext::default())).is_error);
    }

    #[test]
    fn pending_handlers_resolve_through_their_future() {
        let registry = CommandRegistry::new();
        registry.register(
            CommandDescriptor::new("contact", "Contact", CommandGroup::Navigation),
            Rc::new(|_: CommandInvocation| {
                CommandOutcome::Pending(Box::pin(async { CommandResult::text("loaded") }))
            }),
        );
        let outcome = registry.execute("contact", CommandContext::default());
        assert!(matches!(outcome, CommandOutcome::Pending(_)));
        assert_eq!(ready(outcome).output, "loaded");
    }
}
