//! Editor trait
//!
//! The document widget belongs to the host application. This is the slice of
//! it the link flow writes to.

/// A document with a cursor, plus a way to tell the user something
pub trait Editor {
    /// Inserts a hyperlink at the cursor and moves the cursor past it
    fn insert_link(&mut self, text: &str, href: &str);

    /// Inserts plain text at the cursor and moves the cursor past it
    fn insert_text(&mut self, text: &str);

    /// Shows a blocking message to the user
    fn show_message(&mut self, message: &str);
}
