//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use xcomponent::ExtractedMessage;

/// Messages extracted from one source file.
pub struct FileMessages {
    pub file: String,
    pub messages: Vec<ExtractedMessage>,
}

/// Format extracted messages as an ASCII table.
pub fn format_messages_table(files: &[FileMessages]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Location", "Context", "Message", "Comments"]);

    for file in files {
        for message in &file.messages {
            table.add_row(vec![
                format!("{}:{}", file.file, message.lineno),
                message.context.clone(),
                message.message.clone(),
                message.comments.clone(),
            ]);
        }
    }

    table
}
