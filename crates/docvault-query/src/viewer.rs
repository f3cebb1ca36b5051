//! The caller a search runs on behalf of.

/// A user plus any link shares they present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub share_ids: Vec<String>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            share_ids: Vec::new(),
        }
    }

    /// Present a link share, making its document visible.
    pub fn with_share(mut self, share_id: impl Into<String>) -> Self {
        self.share_ids.push(share_id.into());
        self
    }

    /// A viewer without a user id sees nothing.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.trim().is_empty()
    }
}
