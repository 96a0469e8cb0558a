//! Text rendering of DocBase records for tool results

use crate::docbase::{Comment, Post};

/// Full post text for get_post_by_post_id
pub fn format_post(post: &Post) -> String {
    format!("Title: {}\nBody: {}\n", post.title, post.body)
}

/// Short confirmation after a post was created or updated
pub fn format_saved_post(headline: &str, post: &Post) -> String {
    let mut text = format!("{}\nTitle: {}\nID: {}", headline, post.title, post.id);
    if let Some(url) = &post.url {
        text.push_str(&format!("\nURL: {}", url));
    }
    let tags = post.tag_names();
    if !tags.is_empty() {
        text.push_str(&format!("\nTags: {}", tags.join(", ")));
    }
    text
}

pub fn format_comment(comment: &Comment) -> String {
    format!(
        "Comment created successfully!\nID: {}\nBody: {}",
        comment.id, comment.body
    )
}
