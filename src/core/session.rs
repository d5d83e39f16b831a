use serde::{Deserialize, Serialize};

/// Where an adopter is in their browsing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No recommendation list has been built yet
    Idle,
    /// A pet is waiting for a like or skip
    Browsing,
    /// Every recommended pet has been decided on
    Exhausted,
}

/// One adopter's pass over a ranked recommendation list.
///
/// Built fresh from each `recommend` call and advanced by one position per
/// decision. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSession {
    #[serde(rename = "petIds")]
    pet_ids: Option<Vec<String>>,
    cursor: usize,
}

impl RecommendationSession {
    /// Session with no list, in the `Idle` state
    pub fn idle() -> Self {
        Self::default()
    }

    /// Start browsing over an already ranked list of pet ids
    pub fn start<I, S>(ranked_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pet_ids: Some(ranked_ids.into_iter().map(Into::into).collect()),
            cursor: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.pet_ids {
            None => SessionState::Idle,
            Some(ids) if self.cursor < ids.len() => SessionState::Browsing,
            Some(_) => SessionState::Exhausted,
        }
    }

    /// Pet id under the cursor, if browsing
    pub fn current(&self) -> Option<&str> {
        self.pet_ids
            .as_ref()
            .and_then(|ids| ids.get(self.cursor))
            .map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.pet_ids.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.cursor)
    }

    pub fn pet_ids(&self) -> &[String] {
        self.pet_ids.as_deref().unwrap_or(&[])
    }

    /// Move past the current pet. Saturates once the list is exhausted and
    /// never leaves `Idle`.
    pub fn advance(&mut self) {
        if self.state() == SessionState::Browsing {
            self.cursor += 1;
        }
    }
}
