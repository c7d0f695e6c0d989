#![no_main]

//! Fuzz target for HTML rendering
//!
//! Free text from commits and descriptions must never leak markup into
//! the rendered block.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use gitgrazer::describe::ChangeDescription;
use gitgrazer::render::{OutputFormat, escape_html};
use gitgrazer_git::Commit;

#[derive(Arbitrary, Debug)]
struct Input {
    author: String,
    message: String,
    content: String,
    summary: String,
    timestamp: i32,
}

fuzz_target!(|input: Input| {
    let Some(timestamp) = chrono::DateTime::from_timestamp(i64::from(input.timestamp), 0) else {
        return;
    };
    let commit = Commit {
        sha: "0".repeat(40),
        message: input.message,
        author: input.author,
        author_email: String::new(),
        timestamp: timestamp.fixed_offset(),
        parents: vec![],
    };
    let description = ChangeDescription {
        content: input.content,
        diff_summary: input.summary,
    };

    let out = OutputFormat::Html.render(&commit, Some(&description));
    let stripped = out
        .replace("<div class='commit'>", "")
        .replace("</div>", "")
        .replace("<br>", "");
    assert!(!stripped.contains('<'));
    assert!(!stripped.contains('>'));

    let _ = escape_html(&commit.message);
    let _ = OutputFormat::Text.render(&commit, None);
});
