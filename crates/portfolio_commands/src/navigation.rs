//! Project navigation, documents, and terminal housekeeping commands.

use std::rc::Rc;

use leptos::logging::warn;
use terminal_shell::{CommandInvocation, CommandOutcome};
use terminal_shell_contract::{
    CommandAction, CommandContext, CommandDescriptor, CommandGroup, CommandResult,
    CommandVisibility, OverlayKind,
};

use crate::{
    config::DocumentMode,
    matching::{find_project, suggestions},
    CommandRegistration, PortfolioServices,
};

const HELP_HEADER: &str = "Available commands (click to run):";
const HELP_FOOTER: &str = "Press ESC to close any open viewer or overlay.";
/// Width of the `[cmd:<name>]` column in `help`, so descriptions start at column 26.
const HELP_TOKEN_COLUMN: usize = 24;

pub(crate) fn help_descriptor() -> CommandDescriptor {
    CommandDescriptor::new("help", "Show this help message", CommandGroup::Navigation)
}

pub(crate) fn help_registration(catalog: Vec<CommandDescriptor>) -> CommandRegistration {
    let text = help_text(&catalog);
    CommandRegistration {
        descriptor: help_descriptor(),
        handler: Rc::new(move |_: CommandInvocation| CommandResult::text(text.clone()).into()),
    }
}

fn help_text(catalog: &[CommandDescriptor]) -> String {
    let mut lines = vec![HELP_HEADER.to_string(), String::new()];
    let mut first_group = true;
    for group in [CommandGroup::Navigation, CommandGroup::System, CommandGroup::Games] {
        let entries = catalog
            .iter()
            .filter(|descriptor| {
                descriptor.group == group && descriptor.visibility == CommandVisibility::Public
            })
            .map(|descriptor| {
                let token = format!("[cmd:{}]", descriptor.name);
                format!("  {token:<HELP_TOKEN_COLUMN$}{}", descriptor.description)
            })
            .collect::<Vec<_>>();
        if entries.is_empty() {
            continue;
        }
        if !first_group {
            lines.push(String::new());
        }
        first_group = false;
        lines.extend(entries);
    }
    lines.push(String::new());
    lines.push(HELP_FOOTER.to_string());
    lines.join("\n")
}

pub(crate) fn registrations(services: &PortfolioServices) -> Vec<CommandRegistration> {
    vec![
        open_registration(),
        close_registration(),
        document_registration(services, OverlayKind::Contact),
        document_registration(services, OverlayKind::Imprint),
        clear_registration(),
        history_registration(),
    ]
}

fn open_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(
            "open",
            "List projects / open a project",
            CommandGroup::Navigation,
        )
        .with_alias("ls")
        .with_usage("open <project_name> [media_number]"),
        handler: Rc::new(|invocation: CommandInvocation| {
            open_project(&invocation.context, &invocation.args).into()
        }),
    }
}

fn open_project(context: &CommandContext, args: &[String]) -> CommandResult {
    if context.projects.is_empty() {
        return CommandResult::text(
            "No projects found.\n\nAdd projects to /public/projects/ and rebuild.",
        );
    }
    if args.is_empty() {
        let listing = context
            .projects
            .iter()
            .map(|project| format!("  [cmd:{}|open {}]", project.display_name(), project.id))
            .collect::<Vec<_>>()
            .join("\n");
        return CommandResult::text(format!("open <project_name>\n\n{listing}"));
    }

    let (query_args, media_number) = split_media_number(args);
    let raw = query_args.join(" ");
    let Some(project) = find_project(&context.projects, &raw) else {
        let mut output = format!("Project '{raw}' not found.");
        let hints = suggestions(&context.projects, &raw);
        if !hints.is_empty() {
            output.push_str(&format!("\n\nDid you mean: {}?", hints.join(", ")));
        }
        output.push_str("\n\nType 'open' to list available projects.");
        return CommandResult::error(output);
    };

    let media_index = media_number
        .filter(|number| (1..=project.media.len()).contains(number))
        .map(|number| number - 1);
    CommandResult::text(format!("Opening {}...", project.display_name())).with_action(
        CommandAction::OpenViewer {
            project_id: project.id.clone(),
            media_index,
        },
    )
}

/// Splits a trailing 1-based media number off a multi-word query.
fn split_media_number(args: &[String]) -> (&[String], Option<usize>) {
    match args.split_last() {
        Some((last, rest)) if !rest.is_empty() => match last.parse::<usize>() {
            Ok(number) => (rest, Some(number)),
            Err(_) => (args, None),
        },
        _ => (args, None),
    }
}

fn close_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(
            "close",
            "Close the open viewer or overlay",
            CommandGroup::Navigation,
        ),
        handler: Rc::new(|invocation: CommandInvocation| {
            let context = &invocation.context;
            let result = if context.current_viewer.is_some() {
                CommandResult::text("Viewer closed.").with_action(CommandAction::CloseViewer)
            } else if context.current_overlay.is_some() {
                CommandResult::text("Overlay closed.").with_action(CommandAction::CloseOverlay)
            } else {
                CommandResult::text("Nothing to close.")
            };
            result.into()
        }),
    }
}

fn document_registration(services: &PortfolioServices, overlay: OverlayKind) -> CommandRegistration {
    let (description, failure) = match overlay {
        OverlayKind::Contact => (
            "Show contact information",
            "Could not load contact information. Please try again later.",
        ),
        OverlayKind::Imprint => (
            "Show legal notice (Impressum)",
            "Could not load legal notice. Please try again later.",
        ),
    };
    let services = services.clone();
    CommandRegistration {
        descriptor: CommandDescriptor::new(overlay.label(), description, CommandGroup::Navigation),
        handler: Rc::new(move |_: CommandInvocation| {
            if services.config.document_mode == DocumentMode::Overlay {
                return CommandResult::text(format!("Opening {}...", overlay.label()))
                    .with_action(CommandAction::ShowOverlay { overlay })
                    .into();
            }
            let path = match overlay {
                OverlayKind::Contact => services.config.contact_path.clone(),
                OverlayKind::Imprint => services.config.imprint_path.clone(),
            };
            let content = Rc::clone(&services.content);
            let documents = Rc::clone(&services.documents);
            CommandOutcome::Pending(Box::pin(async move {
                match content.fetch_text(&path).await {
                    Ok(markdown) => CommandResult::text(documents.render(&markdown)),
                    Err(err) => {
                        warn!("{} document load failed: {err}", overlay.label());
                        CommandResult::error(failure)
                    }
                }
            }))
        }),
    }
}

fn clear_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new("clear", "Clear the terminal", CommandGroup::Navigation),
        handler: Rc::new(|_: CommandInvocation| {
            CommandResult::empty()
                .with_action(CommandAction::Clear)
                .into()
        }),
    }
}

fn history_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(
            "history",
            "Toggle limited history mode",
            CommandGroup::Navigation,
        ),
        handler: Rc::new(|invocation: CommandInvocation| {
            let enabled = !invocation.context.limited_history;
            let state = if enabled { "enabled" } else { "disabled" };
            CommandResult::text(format!(
                "Limited history mode {state}.\n\
                 When enabled, only the current line and one history line are displayed.\n\
                 Run 'history' again to toggle."
            ))
            .with_action(CommandAction::SetLimitedHistory { enabled })
            .into()
        }),
    }
}
