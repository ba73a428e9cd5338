use rd_core::RawPost;
use serde::Deserialize;

/// `{"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {...}}]}}`
#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing {
    pub data: RawPost,
}

impl Listing {
    pub fn into_posts(self) -> Vec<RawPost> {
        self.data.children.into_iter().map(|child| child.data).collect()
    }
}

/// Error payload the upstream API attaches to most failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: Option<String>,
    pub reason: Option<String>,
}
