use thiserror::Error;

/// A fully rendered outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail seam.
///
/// Callers in the status workflow treat failures as best-effort: they log and
/// continue, so implementations should not retry internally.
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Derives the plain-text body from markup by dropping tags. Text content
/// and the whitespace between block elements survive.
pub fn strip_tags(html: &str) -> String {
    let mut plain = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => plain.push(ch),
            _ => {}
        }
    }
    let lines: Vec<&str> = plain
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}
