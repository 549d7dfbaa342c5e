//! Decorative system-information commands.

use std::rc::Rc;

use nu_ansi_term::{Color, Style};
use terminal_shell::{
    art::render_block_art,
    banner::{banner_columns, brand_block},
    CommandInvocation,
};
use terminal_shell_contract::{CommandDescriptor, CommandGroup, CommandResult};

use crate::{CommandRegistration, PortfolioServices};

/// Longest text `ansi` renders, in characters.
pub const ANSI_TEXT_LIMIT: usize = 20;
/// Narrowest width `ansi` lays its art out for.
pub const ART_MIN_WIDTH: usize = 40;

const NEOFETCH_ART: [&str; 7] = [
    "       ████████╗",
    "       ╚══██╔══╝",
    "          ██║",
    "          ██║",
    "          ██║",
    "          ╚═╝",
    "",
];
const NEOFETCH_INFO: [&str; 7] = [
    "",
    "Portfolio Terminal",
    "----------------",
    "OS: Web Browser",
    "Host: Your Device",
    "Terminal: WebAssembly",
    "Theme: Dark",
];
const NEOFETCH_ART_COLUMN: usize = 19;

pub(crate) fn registrations(services: &PortfolioServices) -> Vec<CommandRegistration> {
    vec![
        whoami_registration(services),
        uname_registration(services),
        neofetch_registration(),
        ansi_registration(),
    ]
}

fn whoami_registration(services: &PortfolioServices) -> CommandRegistration {
    let brand = services.brand.clone();
    CommandRegistration {
        descriptor: CommandDescriptor::new("whoami", "Who are you?", CommandGroup::System),
        handler: Rc::new(move |invocation: CommandInvocation| {
            let cols = banner_columns(invocation.context.surface);
            CommandResult::text(brand_block(&brand, cols).join("\n")).into()
        }),
    }
}

fn uname_registration(services: &PortfolioServices) -> CommandRegistration {
    let version = services.config.version.clone();
    CommandRegistration {
        descriptor: CommandDescriptor::new("uname", "System information", CommandGroup::System)
            .with_usage("uname [-a]"),
        handler: Rc::new(move |invocation: CommandInvocation| {
            let output = if invocation.args.iter().any(|arg| arg == "-a") {
                format!("Portfolio {version} Web Browser WebAssembly")
            } else {
                "Portfolio".to_string()
            };
            CommandResult::text(output).into()
        }),
    }
}

fn neofetch_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(
            "neofetch",
            "System information with style",
            CommandGroup::System,
        ),
        handler: Rc::new(|_: CommandInvocation| CommandResult::text(neofetch_text()).into()),
    }
}

fn neofetch_text() -> String {
    let title = Style::new().bold();
    NEOFETCH_ART
        .iter()
        .zip(NEOFETCH_INFO)
        .enumerate()
        .map(|(row, (art, info))| {
            let padding = " ".repeat(NEOFETCH_ART_COLUMN.saturating_sub(art.chars().count()));
            let info = if row == 1 {
                title.paint(info).to_string()
            } else {
                info.to_string()
            };
            let line = format!("{}{padding}{info}", Color::Cyan.paint(*art));
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ansi_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(
            "ansi",
            "Generate ANSI art from text",
            CommandGroup::System,
        )
        .with_usage("ansi <text>"),
        handler: Rc::new(|invocation: CommandInvocation| {
            if invocation.args.is_empty() {
                return CommandResult::error("Usage: ansi <text>\n\nExample: ansi hello").into();
            }
            let text = invocation.args.join(" ");
            if text.chars().count() > ANSI_TEXT_LIMIT {
                return CommandResult::error(format!(
                    "Text too long. Maximum {ANSI_TEXT_LIMIT} characters."
                ))
                .into();
            }
            let cols = usize::from(banner_columns(invocation.context.surface));
            let width = (cols * 95 / 100).max(ART_MIN_WIDTH);
            CommandResult::text(render_block_art(&text, Color::Cyan, Some(width))).into()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DocumentMode,
        tests::{registry, run, services},
    };
    use platform_host::MemoryContentService;
    use pretty_assertions::assert_eq;
    use terminal_shell::strip_ansi;
    use terminal_shell_contract::{CommandContext, SurfaceMetrics};

    fn context(cols: u16) -> CommandContext {
        CommandContext {
            surface: SurfaceMetrics::new(cols, 30),
            ..CommandContext::default()
        }
    }

    #[test]
    fn uname_reports_the_configured_version() {
        let services = services(DocumentMode::Inline, MemoryContentService::default());
        let (registry, _handles) = registry(&services);
        assert_eq!(run(&registry, "uname", context(80)).output, "Portfolio");
        assert_eq!(
            run(&registry, "uname -a", context(80)).output,
            format!(
                "Portfolio {} Web Browser WebAssembly",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn neofetch_aligns_info_at_a_fixed_column() {
        let plain = strip_ansi(&neofetch_text());
        let lines = plain.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "       ╚══██╔══╝   Portfolio Terminal");
        assert_eq!(lines[5], "          ╚═╝      Terminal: WebAssembly");
        assert_eq!(lines[6], "                   Theme: Dark");
    }

    #[test]
    fn ansi_validates_length_and_sizes_to_the_surface() {
        let services = services(DocumentMode::Inline, MemoryContentService::default());
        let (registry, _handles) = registry(&services);

        let usage = run(&registry, "ansi", context(80));
        assert!(usage.is_error);
        assert_eq!(usage.output, "Usage: ansi <text>\n\nExample: ansi hello");

        let long = run(&registry, "ansi abcdefghijk lmnopqrstu", context(80));
        assert_eq!(
            long,
            CommandResult::error("Text too long. Maximum 20 characters.")
        );

        // Narrow surfaces still get 40 columns, which hold six glyphs per block.
        let art = strip_ansi(&run(&registry, "ansi abcdefgh", context(30)).output);
        assert_eq!(art.lines().count(), 11);
        let wide = strip_ansi(&run(&registry, "ansi abcdefgh", context(120)).output);
        assert_eq!(wide.lines().count(), 5);
    }

    #[test]
    fn whoami_prints_the_brand_block() {
        let services = services(DocumentMode::Inline, MemoryContentService::default());
        let (registry, _handles) = registry(&services);
        let plain = strip_ansi(&run(&registry, "whoami", context(120)).output);
        let lines = plain.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "  Creative Developer & Digital Artist");
        assert_eq!(lines[6], "  Building beautiful digital experiences");
    }
}
