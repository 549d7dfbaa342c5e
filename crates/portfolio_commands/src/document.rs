//! Markdown documents rendered as terminal markup.
//!
//! Only the subset the contact and imprint documents use is understood: `#` headings, `-` and
//! `*` bullets, `---` rules, `**bold**`, `*emphasis*`, `[text](url)` links, bare email
//! addresses, and `@handle` mentions on lines that talk about Instagram. Links become
//! `[link:..]` and `[mailto:..]` tokens, so the shell's link policy still has the final say.

use nu_ansi_term::{Color, Style};
use regex::{Captures, Regex};

const MARKDOWN_LINK: &str = r"\[([^\]]+)\]\(([^)\s]+)\)";
const EMAIL: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}";
const HANDLE: &str = r"(^|[\s(:])@([A-Za-z0-9._]{1,30})";
const BOLD: &str = r"\*\*(.+?)\*\*";
const EMPHASIS: &str = r"\*([^*\s][^*]*)\*";
const RULE_WIDTH: usize = 40;
const INSTAGRAM_URL: &str = "https://instagram.com/";

/// Converts markdown lines into output lines carrying markup tokens.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    link: Regex,
    email: Regex,
    handle: Regex,
    bold: Regex,
    emphasis: Regex,
}

impl DocumentRenderer {
    /// Compiles the inline patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            link: Regex::new(MARKDOWN_LINK)?,
            email: Regex::new(EMAIL)?,
            handle: Regex::new(HANDLE)?,
            bold: Regex::new(BOLD)?,
            emphasis: Regex::new(EMPHASIS)?,
        })
    }

    /// Renders a whole document. Runs of blank lines collapse to one and the result is trimmed.
    pub fn render(&self, markdown: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        for raw in markdown.lines() {
            let line = self.render_line(raw.trim_end());
            if line.is_empty() && lines.last().map_or(true, String::is_empty) {
                continue;
            }
            lines.push(line);
        }
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn render_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return String::new();
        }
        if trimmed == "---" || trimmed == "***" {
            return Color::DarkGray.paint("─".repeat(RULE_WIDTH)).to_string();
        }
        if let Some(heading) = heading_text(trimmed) {
            return Style::new()
                .bold()
                .paint(self.inline(heading))
                .to_string();
        }
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            return format!("  • {}", self.inline(item.trim()));
        }
        self.inline(trimmed)
    }

    /// Rewrites inline syntax. Text inside markdown links is left alone so emails and handles
    /// in link labels are not tokenized twice.
    fn inline(&self, text: &str) -> String {
        let instagram = text.to_lowercase().contains("instagram");
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.link.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&self.plain_span(&text[last..whole.start()], instagram));
            out.push_str(&link_token(&caps));
            last = whole.end();
        }
        out.push_str(&self.plain_span(&text[last..], instagram));
        out
    }

    fn plain_span(&self, text: &str, instagram: bool) -> String {
        let text = self
            .email
            .replace_all(text, |caps: &Captures| {
                format!("[mailto:{0}|{0}]", &caps[0])
            })
            .into_owned();
        let text = if instagram {
            self.handle
                .replace_all(&text, |caps: &Captures| {
                    format!("{0}[link:{INSTAGRAM_URL}{1}|@{1}]", &caps[1], &caps[2])
                })
                .into_owned()
        } else {
            text
        };
        let bold = Style::new().bold();
        let text = self
            .bold
            .replace_all(&text, |caps: &Captures| bold.paint(&caps[1]).to_string())
            .into_owned();
        self.emphasis.replace_all(&text, "$1").into_owned()
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if (1..=6).contains(&level) && rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

fn link_token(caps: &Captures) -> String {
    let label = caps[1].trim();
    let target = caps[2].trim();
    if let Some(address) = target.strip_prefix("mailto:") {
        format!("[mailto:{address}|{label}]")
    } else if target.starts_with("http://") || target.starts_with("https://") {
        format!("[link:{target}|{label}]")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_shell::strip_ansi;

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new().expect("static patterns compile")
    }

    #[test]
    fn contact_document_becomes_tokens() {
        let markdown = "# Contact\n\n\n\
            Write to hello@studio.example for commissions.\n\
            Instagram: @studio.works\n\
            - [Portfolio](https://studio.example) and [mail](mailto:hi@studio.example)\n";
        let rendered = renderer().render(markdown);
        let plain = strip_ansi(&rendered);
        assert_eq!(
            plain.lines().collect::<Vec<_>>(),
            vec![
                "Contact",
                "",
                "Write to [mailto:hello@studio.example|hello@studio.example] for commissions.",
                "Instagram: [link:https://instagram.com/studio.works|@studio.works]",
                "  • [link:https://studio.example|Portfolio] and [mailto:hi@studio.example|mail]",
            ]
        );
    }

    #[test]
    fn handles_outside_instagram_lines_stay_plain() {
        let rendered = renderer().render("Ping @someone anytime.");
        assert_eq!(rendered, "Ping @someone anytime.");
    }

    #[test]
    fn relative_links_keep_only_their_label_and_emphasis_is_unwrapped() {
        let rendered = renderer().render("See [the archive](/archive) for *older* work.\n---");
        let plain = strip_ansi(&rendered);
        assert_eq!(
            plain.lines().collect::<Vec<_>>(),
            vec!["See the archive for older work.", &"─".repeat(RULE_WIDTH)]
        );
        assert!(renderer().render("**Owner:** Jane").contains("\x1b[1m"));
    }
}
