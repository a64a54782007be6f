use std::sync::Arc;

pub const DEFAULT_VIDEOS: [&str; 5] = [
    "https://youtu.be/eOpnW0A9DJU",
    "https://youtu.be/6JRrP13RXEQ",
    "https://youtu.be/ttCdNXR18No",
    "https://youtu.be/nfr98JD80V0",
    "https://youtu.be/Z90-cYYyQK0",
];

/// Ordered, read-only list of video links shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCatalog(Arc<[String]>);

impl VideoCatalog {
    pub fn new(videos: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(videos.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for VideoCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEOS)
    }
}
