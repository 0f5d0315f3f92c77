//! Voter queue engine.
//!
//! Holds the working list of voters and a cursor over it. Rotation is
//! circular. A voter whose numbers are all flagged (or absent) is removed;
//! removing the last voter empties the queue and asks for a repopulation.
//!
//! The queue is purely in-memory. Persisting it and rendering the current
//! card are the caller's job after each structural change.

use crate::models::{PendingFlag, Voter};
use crate::presenter::VoterCard;

/// Result of removing a voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The voter was removed and others remain
    Removed,
    /// The sole voter was removed; the queue is empty and must be repopulated
    Exhausted,
    /// The index did not name a voter; nothing changed
    Ignored,
}

/// What `flag` did after marking the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStep {
    /// The voter still has a number; the cursor moved on
    Advanced,
    /// The voter had no numbers left and was removed
    Dropped(DropOutcome),
}

/// Result of flagging the current voter's active number.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagOutcome {
    /// Outcome record to deliver, absent if the voter had no active number
    pub record: Option<PendingFlag>,
    pub step: FlagStep,
}

/// Ordered voters plus a cursor. `cursor < len` whenever `len > 0`, and
/// `cursor == 0` when empty.
#[derive(Debug, Clone, Default)]
pub struct VoterQueue {
    voters: Vec<Voter>,
    cursor: usize,
}

impl VoterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents and rewind the cursor.
    pub fn load(&mut self, voters: Vec<Voter>) {
        self.voters = voters;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.voters.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    pub fn current(&self) -> Option<&Voter> {
        self.voters.get(self.cursor)
    }

    /// Card for the current voter, or the placeholder when empty.
    pub fn card(&self) -> VoterCard {
        match self.current() {
            Some(voter) => VoterCard::for_voter(voter, self.voters.len()),
            None => VoterCard::placeholder(),
        }
    }

    /// Move to the next voter, wrapping from the last back to the first.
    pub fn advance(&mut self) {
        if self.voters.is_empty() {
            return;
        }
        if self.cursor == self.voters.len() - 1 {
            self.cursor = 0;
        } else {
            self.cursor += 1;
        }
    }

    /// Remove the voter at `index`.
    ///
    /// The cursor is first placed on `index`, so afterwards it rests on the
    /// voter that followed the removed one, or on the first voter when the
    /// removed one was last.
    pub fn drop_at(&mut self, index: usize) -> DropOutcome {
        if index >= self.voters.len() {
            return DropOutcome::Ignored;
        }
        if self.voters.len() == 1 {
            self.clear();
            return DropOutcome::Exhausted;
        }

        self.voters.remove(index);
        self.cursor = if index >= self.voters.len() { 0 } else { index };
        tracing::debug!(
            "Dropped voter at index {}; {} remain",
            index,
            self.voters.len()
        );
        DropOutcome::Removed
    }

    /// Flag the current voter's active number.
    ///
    /// Marks the number unusable, produces the outcome record, then either
    /// advances or drops the voter if no contactable number remains.
    /// Returns `None` when the queue is empty.
    pub fn flag(&mut self) -> Option<FlagOutcome> {
        let cursor = self.cursor;
        let voter = self.voters.get_mut(cursor)?;

        let record = voter.active_number().map(|slot| {
            voter.mark_flagged(slot);
            tracing::debug!(
                "Flagged number {} for voter {}",
                slot.as_number(),
                voter.id
            );
            PendingFlag::new(voter.resource_uri.clone(), slot)
        });

        let step = if voter.is_contactable() {
            self.advance();
            FlagStep::Advanced
        } else {
            FlagStep::Dropped(self.drop_at(cursor))
        };

        Some(FlagOutcome { record, step })
    }
}
