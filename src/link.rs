//! Ticket link insertion
//!
//! Entry point the host calls when the user asks for a ticket link.

use crate::editor::Editor;
use crate::tracker::{BugTracker, TicketData};
use crate::RequestError;

/// What happened to a link request
#[derive(Debug)]
pub enum LinkOutcome {
    /// The ticket ID was empty; nothing was requested or written
    Skipped,

    /// The link and title were written at the cursor
    Inserted(TicketData),

    /// The lookup failed and the user was shown the error
    Failed(RequestError),
}

impl LinkOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LinkOutcome::Failed(_))
    }
}

/// Looks up a ticket and writes a link to it at the editor cursor
///
/// On success the editor receives the link (text = ticket label, target =
/// ticket URL) followed by the title and a newline. On failure the error text
/// is shown to the user and the document is left untouched.
///
/// # Example
///
/// ```no_run
/// use ticket_link::config::Config;
/// use ticket_link::{insert_ticket_link, BugTracker, LinkFormat, TextBuffer};
///
/// # async fn run() {
/// let mut tracker = BugTracker::from_config(&Config::default());
/// let mut buffer = TextBuffer::new(LinkFormat::Markdown);
/// insert_ticket_link(&mut tracker, &mut buffer, "123456").await;
/// println!("{}", buffer.content());
/// # }
/// ```
pub async fn insert_ticket_link<E>(
    tracker: &mut BugTracker,
    editor: &mut E,
    ticket_id: &str,
) -> LinkOutcome
where
    E: Editor + ?Sized,
{
    let ticket_id = ticket_id.trim();
    if ticket_id.is_empty() {
        return LinkOutcome::Skipped;
    }

    match tracker.get_ticket_data(ticket_id).await {
        Ok(data) => {
            editor.insert_link(&data.ticket_label, &data.url);
            editor.insert_text(&format!(" {}\n", data.title));
            tracing::info!(ticket = ticket_id, url = %data.url, "inserted ticket link");
            LinkOutcome::Inserted(data)
        }
        Err(e) => {
            tracing::warn!(ticket = ticket_id, "ticket lookup failed: {}", e);
            editor.show_message(&e.to_string());
            LinkOutcome::Failed(e)
        }
    }
}
