use chrono::{DateTime, Local, TimeZone};
use crate::types::{Article, RawPost};

const IMAGE_DOMAIN: &str = "i.redd.it";
const VIDEO_DOMAIN: &str = "v.redd.it";
const IMAGE_HINT: &str = "image";
const FALLBACK_SUFFIX: &str = "?source=fallback";

/// Reduce an upstream post to an [`Article`].
///
/// Never fails: absent optional fields fall back to `false`, `0` or an empty string.
pub fn normalize(raw: RawPost) -> Article {
    let media_url = media_url(&raw);
    Article {
        id: raw.id.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        nsfw: raw.over_18.unwrap_or(false),
        spoiler: raw.spoiler.unwrap_or(false),
        selftext: raw.selftext.unwrap_or_default(),
        score: raw.score.unwrap_or(0),
        created_utc: timestamp(raw.created_utc.unwrap_or(0.0)),
        permalink: raw.permalink.unwrap_or_default(),
        subreddit: raw.subreddit.unwrap_or_default(),
        stickied: raw.stickied.unwrap_or(false),
        media_url,
    }
}

pub fn normalize_all(posts: Vec<RawPost>) -> Vec<Article> {
    posts.into_iter().map(normalize).collect()
}

/// Direct media link for natively hosted images and videos, if any.
///
/// Image check wins over the video check.
pub fn media_url(raw: &RawPost) -> Option<String> {
    let domain = raw.domain.as_deref().unwrap_or_default();
    let hint = raw.post_hint.as_deref().unwrap_or_default();

    if domain.contains(IMAGE_DOMAIN) || hint.contains(IMAGE_HINT) {
        return raw.url.clone();
    }

    if domain.contains(VIDEO_DOMAIN) && raw.is_video.unwrap_or(false) {
        let fallback = raw
            .media
            .as_ref()
            .and_then(|media| media.reddit_video.as_ref())
            .and_then(|video| video.fallback_url.as_deref());
        return match fallback {
            Some(url) => Some(url.strip_suffix(FALLBACK_SUFFIX).unwrap_or(url).to_string()),
            None => {
                tracing::debug!(
                    "Video post {} has no fallback url",
                    raw.id.as_deref().unwrap_or("<unknown>")
                );
                None
            }
        };
    }

    None
}

fn timestamp(epoch_seconds: f64) -> DateTime<Local> {
    let epoch = Local.timestamp_opt(0, 0).single();
    if !epoch_seconds.is_finite() {
        return epoch.unwrap_or_else(Local::now);
    }
    let whole = epoch_seconds.floor();
    let secs = whole as i64;
    let nanos = ((epoch_seconds - whole) * 1e9) as u32;
    Local
        .timestamp_opt(secs, nanos)
        .single()
        .or(epoch)
        .unwrap_or_else(Local::now)
}
