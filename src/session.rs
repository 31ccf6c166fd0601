//! Cumulative player state for one visit: score, the submitted drawings,
//! the (optional) user identity and the local mirror of the persisted set.
//!
//! The async methods compose gateway calls with the matching local
//! mutation; the sync mutators exist separately because the browser layer
//! cannot hold the state cell borrowed across an await and applies results
//! as they arrive.

use log::{debug, warn};

use crate::store::{DrawingStore, StoreError};

#[derive(Default)]
pub struct Session {
    score: i64,
    drawings: Vec<String>,
    user: Option<String>,
    saved: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Drawings submitted this visit, in submission order.
    pub fn drawings(&self) -> &[String] {
        &self.drawings
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Local mirror of the user's persisted drawing set.
    pub fn saved(&self) -> &[String] {
        &self.saved
    }

    /// Applies a signed score delta atomically. The score may go negative;
    /// there is no floor.
    pub fn apply_score_delta(&mut self, delta: i64) {
        self.score += delta;
    }

    /// Appends a submitted encoding. Exactly one append happens per
    /// submission; identical encodings are kept, not deduplicated.
    pub fn record_drawing(&mut self, encoding: String) {
        self.drawings.push(encoding);
    }

    /// Adopts a confirmed display name as the current user.
    pub fn adopt_user(&mut self, name: String) {
        debug!("logged in as {name:?}");
        self.user = Some(name);
    }

    /// Replaces the persisted-set mirror wholesale (after a refresh).
    pub fn set_saved(&mut self, saved: Vec<String>) {
        self.saved = saved;
    }

    /// Records a gateway-confirmed add in the mirror. The store keeps a set,
    /// so an encoding already present stays single.
    pub fn mark_saved(&mut self, encoding: String) {
        if !self.saved.iter().any(|d| d == &encoding) {
            self.saved.push(encoding);
        }
    }

    /// Records a gateway-confirmed removal: drops the first and only the
    /// first structurally-equal entry from the mirror.
    pub fn confirm_deleted(&mut self, encoding: &str) {
        if let Some(pos) = self.saved.iter().position(|d| d == encoding) {
            self.saved.remove(pos);
        }
    }

    /// Logs in under `username`: stores the identity, reads it back and
    /// adopts the confirmed display name. Returns whether a user is now
    /// present.
    pub async fn login<S: DrawingStore>(
        &mut self,
        store: &S,
        username: &str,
    ) -> Result<bool, StoreError> {
        // The username doubles as the document key.
        store.save_identity(username, username).await?;
        match store.identity(username).await? {
            Some(name) => {
                self.adopt_user(name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reloads the persisted-set mirror. A no-op with no user.
    pub async fn refresh_saved<S: DrawingStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let Some(user) = self.user.clone() else {
            return Ok(());
        };
        let drawings = store.drawings(&user).await?;
        self.set_saved(drawings);
        Ok(())
    }

    /// Persists one drawing under the current user. A silent no-op with no
    /// user: no state change and no gateway call.
    pub async fn save_drawing<S: DrawingStore>(
        &mut self,
        store: &S,
        encoding: &str,
    ) -> Result<(), StoreError> {
        let Some(user) = self.user.clone() else {
            return Ok(());
        };
        store.save_drawing(&user, encoding).await?;
        self.mark_saved(encoding.to_owned());
        Ok(())
    }

    /// Deletes one persisted drawing. A silent no-op with no user; the
    /// mirror entry is removed only after the gateway confirms.
    pub async fn delete_saved<S: DrawingStore>(
        &mut self,
        store: &S,
        encoding: &str,
    ) -> Result<(), StoreError> {
        let Some(user) = self.user.clone() else {
            return Ok(());
        };
        if let Err(e) = store.delete_drawing(&user, encoding).await {
            warn!("delete failed, keeping local mirror entry: {e}");
            return Err(e);
        }
        self.confirm_deleted(encoding);
        Ok(())
    }
}
