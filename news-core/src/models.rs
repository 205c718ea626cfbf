use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Article shape as returned by the articles API. Owned by the backend; this
/// core only passes it through to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub content: String,
    pub news_provided_by: String,
    // The API emits offset-less ISO-8601 timestamps.
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleListResponse {
    pub items: Vec<Article>,
}
