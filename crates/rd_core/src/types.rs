use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::{Error, Result};

/// A post as returned by the upstream listing endpoints.
///
/// Every field is optional; the normalizer decides on defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub over_18: Option<bool>,
    pub spoiler: Option<bool>,
    pub selftext: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub stickied: Option<bool>,
    pub domain: Option<String>,
    pub post_hint: Option<String>,
    pub is_video: Option<bool>,
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditVideo {
    pub fallback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub author: String,
    pub nsfw: bool,
    pub spoiler: bool,
    pub selftext: String,
    pub score: i64,
    pub created_utc: DateTime<Local>,
    pub permalink: String,
    pub subreddit: String,
    pub stickied: bool,
    pub media_url: Option<String>,
}

impl Article {
    pub fn is_media(&self) -> bool {
        self.media_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn is_text(&self) -> bool {
        !self.selftext.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    pub count: usize,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    #[default]
    All,
    Media,
    Text,
}

impl ContentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFilter::All => "all",
            ContentFilter::Media => "media",
            ContentFilter::Text => "text",
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Media => article.is_media(),
            ContentFilter::Text => article.is_text(),
        }
    }
}

impl FromStr for ContentFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ContentFilter::All),
            "media" => Ok(ContentFilter::Media),
            "text" => Ok(ContentFilter::Text),
            other => Err(format!("Unknown article type: {} (expected all, media or text)", other)),
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing order understood by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Hot,
    New,
    Top,
    Rising,
    Controversial,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Hot => "hot",
            SortType::New => "new",
            SortType::Top => "top",
            SortType::Rising => "rising",
            SortType::Controversial => "controversial",
        }
    }
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(SortType::Hot),
            "new" => Ok(SortType::New),
            "top" => Ok(SortType::Top),
            "rising" => Ok(SortType::Rising),
            "controversial" => Ok(SortType::Controversial),
            other => Err(format!("Unknown sort type: {}", other)),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window for the time-scoped sorts (`top`, `controversial`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(TimeWindow::Hour),
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "year" => Ok(TimeWindow::Year),
            "all" => Ok(TimeWindow::All),
            other => Err(format!("Unknown time window: {}", other)),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Subreddit,
    User,
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subreddit" | "r" => Ok(TargetKind::Subreddit),
            "user" | "u" => Ok(TargetKind::User),
            other => Err(format!("Unknown target kind: {} (expected subreddit or user)", other)),
        }
    }
}

/// The entity whose posts are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub kind: TargetKind,
    pub name: String,
}

impl Target {
    pub fn new(kind: TargetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn subreddit(name: impl Into<String>) -> Self {
        Self::new(TargetKind::Subreddit, name)
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(TargetKind::User, name)
    }

    /// The name must map onto exactly one upstream path segment.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Target name must not be empty".to_string()));
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(Error::Validation(format!("Invalid target name: {}", self.name)));
        }
        Ok(())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TargetKind::Subreddit => write!(f, "r/{}", self.name),
            TargetKind::User => write!(f, "u/{}", self.name),
        }
    }
}

/// Parameters forwarded verbatim to the upstream fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub sort: Option<SortType>,
    pub time: Option<TimeWindow>,
    pub limit: Option<u32>,
}

impl FetchParams {
    /// User submissions only support hot, new, top and controversial.
    pub fn validate_for(&self, target: &Target) -> Result<()> {
        if target.kind == TargetKind::User && self.sort == Some(SortType::Rising) {
            return Err(Error::Validation(
                "Sort type rising is not available for user targets".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("Media".parse::<ContentFilter>().unwrap(), ContentFilter::Media);
        assert_eq!("TOP".parse::<SortType>().unwrap(), SortType::Top);
        assert_eq!("week".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
        assert_eq!("u".parse::<TargetKind>().unwrap(), TargetKind::User);
        assert!("images".parse::<ContentFilter>().is_err());
        assert!("best".parse::<SortType>().is_err());
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&ContentFilter::Text).unwrap(), "\"text\"");
        assert_eq!(serde_json::to_string(&SortType::Controversial).unwrap(), "\"controversial\"");
        assert_eq!(
            serde_json::from_str::<TimeWindow>("\"month\"").unwrap(),
            TimeWindow::Month
        );
    }

    #[test]
    fn test_raw_post_tolerates_missing_and_null_fields() {
        let raw: RawPost = serde_json::from_str(
            r#"{"id": "abc", "media": null, "post_hint": null, "extra": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(raw.id.as_deref(), Some("abc"));
        assert!(raw.media.is_none());
        assert!(raw.post_hint.is_none());
        assert!(raw.score.is_none());
    }

    #[test]
    fn test_target_validation() {
        assert!(Target::subreddit("rust").validate().is_ok());
        assert!(Target::user("some_user-1").validate().is_ok());
        for name in ["", "  ", ".", "..", "a/b", "../r/all", "a\\b"] {
            assert!(
                matches!(Target::subreddit(name).validate(), Err(Error::Validation(_))),
                "{:?} accepted",
                name
            );
            assert!(matches!(Target::user(name).validate(), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_rising_only_for_subreddits() {
        let rising = FetchParams {
            sort: Some(SortType::Rising),
            ..Default::default()
        };
        assert!(rising.validate_for(&Target::subreddit("rust")).is_ok());
        assert!(matches!(
            rising.validate_for(&Target::user("spez")),
            Err(Error::Validation(_))
        ));
        let top = FetchParams {
            sort: Some(SortType::Top),
            ..Default::default()
        };
        assert!(top.validate_for(&Target::user("spez")).is_ok());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::subreddit("rust").to_string(), "r/rust");
        assert_eq!(Target::user("spez").to_string(), "u/spez");
    }
}
