//! Inline markup tokens in command output.
//!
//! Grammar, applied link/mailto first and commands second:
//!
//! - `[link:<url>|<display>]` binds `display` to an `http`/`https` URL
//! - `[mailto:<email>|<display>]` binds `display` to `mailto:<email>`
//! - `[cmd:<command>]` binds the command text to itself
//! - `[cmd:<display>|<command>]` binds `display` to `command`
//!
//! Each accepted token is replaced by its display text in the clickable style, wrapped in an
//! OSC 8 tag carrying the run id so the screen buffer can attribute cells to the run. Rejected
//! link and mailto tokens are left in the line verbatim.

use nu_ansi_term::{Color, Style};
use regex::{Captures, Regex};

use crate::clickable::{ClickableRegistry, RunId};
use crate::link_policy::LinkPolicy;

const LINK_TOKEN: &str = r"\[(link|mailto):([^|\]]+)\|([^\]]+)\]";
const COMMAND_TOKEN: &str = r"\[cmd:([^\]]+)\]";

/// Visual style for clickable runs.
pub fn clickable_style() -> Style {
    Color::Cyan.underline()
}

/// Opening OSC 8 tag for a run.
pub(crate) fn run_open_tag(id: RunId) -> String {
    format!("\x1b]8;;run:{}\x07", id.0)
}

/// Closing OSC 8 tag.
pub(crate) const RUN_CLOSE_TAG: &str = "\x1b]8;;\x07";

/// Rewrites markup tokens into styled, registered clickable runs.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    link_token: Regex,
    command_token: Regex,
    policy: LinkPolicy,
}

impl MarkupParser {
    /// Compiles the token patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            link_token: Regex::new(LINK_TOKEN)?,
            command_token: Regex::new(COMMAND_TOKEN)?,
            policy: LinkPolicy::new()?,
        })
    }

    /// Link safety policy shared with the host effect executor.
    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Parses one output line, registering every accepted token in `registry`.
    pub fn parse(&self, line: &str, registry: &mut ClickableRegistry) -> String {
        let with_links = self
            .link_token
            .replace_all(line, |caps: &Captures| {
                let kind = &caps[1];
                let target = caps[2].trim();
                let display = caps[3].trim();
                let url = if kind == "mailto" {
                    if !self.policy.is_valid_email(target) {
                        return caps[0].to_string();
                    }
                    format!("mailto:{target}")
                } else {
                    if self.policy.check_web_url(target).is_err() {
                        return caps[0].to_string();
                    }
                    target.to_string()
                };
                let id = registry.register_link(display, &url);
                styled_run(id, display)
            })
            .into_owned();

        self.command_token
            .replace_all(&with_links, |caps: &Captures| {
                let content = &caps[1];
                let (display, command) = match content.split_once('|') {
                    Some((display, command)) => (display.trim(), command.trim()),
                    None => (content.trim(), content.trim()),
                };
                if display.is_empty() || command.is_empty() {
                    return caps[0].to_string();
                }
                let id = registry.register_command(display, command);
                styled_run(id, display)
            })
            .into_owned()
    }
}

fn styled_run(id: RunId, display: &str) -> String {
    format!(
        "{}{}{}",
        run_open_tag(id),
        clickable_style().paint(display),
        RUN_CLOSE_TAG
    )
}

/// Removes ANSI and OSC sequences, leaving only printable text.
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            plain.push(ch);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            Some(']') => {
                while let Some(next) = chars.next() {
                    if next == '\x07' {
                        break;
                    }
                    if next == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    plain
}
