//! The portfolio command set.
//!
//! [`registrations`] builds one [`CommandRegistration`] per command (navigation, system
//! information, and the game launchers) and [`register_portfolio_commands`] installs them on a
//! [`CommandRegistry`], returning the handles that keep them alive. Handlers only read the
//! [`terminal_shell_contract::CommandContext`] they are given and describe host work through
//! [`terminal_shell_contract::CommandAction`] values.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod document;
mod games;
pub mod matching;
mod navigation;
mod system;

use std::{fmt, rc::Rc};

use platform_host::ContentService;
use terminal_shell::{BrandConfig, CommandHandler, CommandRegistry, CommandRegistryHandle};
use terminal_shell_contract::CommandDescriptor;

pub use config::{DocumentMode, PortfolioCommandsConfig};
pub use document::DocumentRenderer;

/// One command ready to be installed on a registry.
#[derive(Clone)]
pub struct CommandRegistration {
    /// Registration metadata.
    pub descriptor: CommandDescriptor,
    /// Invocation handler.
    pub handler: CommandHandler,
}

impl fmt::Debug for CommandRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistration")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Services and settings shared by every portfolio command handler.
#[derive(Clone)]
pub struct PortfolioServices {
    /// Command set configuration.
    pub config: Rc<PortfolioCommandsConfig>,
    /// Brand text for `whoami`.
    pub brand: BrandConfig,
    /// Loader for the contact and imprint documents.
    pub content: Rc<dyn ContentService>,
    /// Markdown renderer for those documents.
    pub documents: Rc<DocumentRenderer>,
}

impl PortfolioServices {
    /// Bundles the services and compiles the document renderer.
    pub fn new(
        config: PortfolioCommandsConfig,
        brand: BrandConfig,
        content: Rc<dyn ContentService>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            config: Rc::new(config),
            brand,
            content,
            documents: Rc::new(DocumentRenderer::new()?),
        })
    }
}

impl fmt::Debug for PortfolioServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortfolioServices")
            .field("config", &self.config)
            .field("brand", &self.brand)
            .finish_non_exhaustive()
    }
}

/// Every portfolio command, `help` first.
///
/// `help` receives the finished descriptor list up front, so it never has to reach back into
/// the registry it is installed on.
pub fn registrations(services: &PortfolioServices) -> Vec<CommandRegistration> {
    let mut commands = navigation::registrations(services);
    commands.extend(system::registrations(services));
    commands.extend(games::registrations());

    let mut catalog = vec![navigation::help_descriptor()];
    catalog.extend(commands.iter().map(|command| command.descriptor.clone()));

    let mut all = vec![navigation::help_registration(catalog)];
    all.extend(commands);
    all
}

/// Installs the portfolio commands and returns the owning handles.
///
/// Dropping a handle unregisters its command, so the caller keeps the vector alive for as long
/// as the commands should stay available.
pub fn register_portfolio_commands(
    registry: &CommandRegistry,
    services: &PortfolioServices,
) -> Vec<CommandRegistryHandle> {
    registrations(services)
        .into_iter()
        .map(|registration| registry.register_scoped(registration.descriptor, registration.handler))
        .collect()
}
