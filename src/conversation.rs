use crate::errors::ChatError;
use crate::models::message::Turn;

/// Proof that a user turn was speculatively appended. Must be settled with
/// `commit_model` or `rollback`; at most one may be outstanding at a time.
#[derive(Debug)]
#[must_use = "a reserved user turn must be committed or rolled back"]
pub struct RollbackToken {
    id: u64,
    index: usize,
}

/// Ordered conversation history, append-only on the committed path.
///
/// The one mutation that is not an append is `rollback`, which removes
/// exactly the reserved user turn while it is still the most recent entry.
/// Under single-flight submission discipline that is always the case; a
/// mismatched token is a bug in the caller and reported as `Protocol`.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    reserved: Option<u64>,
    next_token: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Adds a turn to the end. The only validation is that the turn carries
    /// at least one content part.
    pub fn append(&mut self, turn: Turn) -> Result<(), ChatError> {
        if turn.parts.is_empty() {
            return Err(ChatError::Validation(
                "a turn requires at least one content part".to_string(),
            ));
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Records the user turn and returns the token that must later settle it.
    pub fn reserve_user(&mut self, turn: Turn) -> Result<RollbackToken, ChatError> {
        if self.reserved.is_some() {
            return Err(ChatError::Protocol(
                "a reserved turn is already outstanding".to_string(),
            ));
        }
        self.append(turn)?;

        let id = self.next_token;
        self.next_token += 1;
        self.reserved = Some(id);

        Ok(RollbackToken {
            id,
            index: self.turns.len() - 1,
        })
    }

    /// Appends the paired model turn and invalidates the token.
    pub fn commit_model(&mut self, token: RollbackToken, turn: Turn) -> Result<(), ChatError> {
        self.check_tail(&token)?;
        self.turns.push(turn);
        self.reserved = None;
        Ok(())
    }

    /// Removes exactly the turn the token reserved.
    pub fn rollback(&mut self, token: RollbackToken) -> Result<(), ChatError> {
        self.check_tail(&token)?;
        self.turns.pop();
        self.reserved = None;
        Ok(())
    }

    fn check_tail(&self, token: &RollbackToken) -> Result<(), ChatError> {
        if self.reserved != Some(token.id) || token.index + 1 != self.turns.len() {
            return Err(ChatError::Protocol(
                "token does not correspond to the most recent append".to_string(),
            ));
        }
        Ok(())
    }
}
