//! Safety policy for URLs and email addresses that become clickable.

use regex::Regex;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

/// Why a link was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDenial {
    /// Scheme other than `http`, `https`, or `mailto`.
    SchemeBlocked,
    /// Missing host, stray whitespace, control characters, or quoting characters.
    Malformed,
    /// `mailto:` address failed validation.
    InvalidEmail,
}

/// Decides which URLs may be opened from terminal output.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    email: Regex,
}

impl LinkPolicy {
    /// Builds the policy.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Returns whether `address` is a plain email address.
    pub fn is_valid_email(&self, address: &str) -> bool {
        address.len() <= 254 && self.email.is_match(address)
    }

    /// Validates an `http` or `https` URL.
    pub fn check_web_url(&self, url: &str) -> Result<(), LinkDenial> {
        let (scheme, rest) = url.split_once("://").ok_or(LinkDenial::SchemeBlocked)?;
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(LinkDenial::SchemeBlocked);
        }
        if url
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '"' | '\'' | '<' | '>' | '`'))
        {
            return Err(LinkDenial::Malformed);
        }
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = host.split(':').next().unwrap_or(host).trim_end_matches('.');
        if host.is_empty() {
            return Err(LinkDenial::Malformed);
        }
        Ok(())
    }

    /// Validates any URL the host may be asked to open, including `mailto:` links.
    pub fn check(&self, url: &str) -> Result<(), LinkDenial> {
        match url.split_once(':') {
            Some((scheme, address)) if scheme.eq_ignore_ascii_case("mailto") => {
                if self.is_valid_email(address) {
                    Ok(())
                } else {
                    Err(LinkDenial::InvalidEmail)
                }
            }
            _ => self.check_web_url(url),
        }
    }
}
