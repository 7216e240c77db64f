//! Call ledger: ringing and answered calls.

use std::collections::HashMap;

use crate::domain::{UserId, UserState};

/// Pending and active calls.
///
/// `pending` maps callee -> caller and `outgoing` is its exact reverse
/// (caller -> callee); both are always updated together. `active` holds each
/// answered call twice, once per direction.
#[derive(Debug, Default)]
pub struct CallLedger {
    pending: HashMap<UserId, UserId>,
    outgoing: HashMap<UserId, UserId>,
    active: HashMap<UserId, UserId>,
}

impl CallLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a ringing call. Callers check the preconditions first.
    pub fn ring(&mut self, caller: UserId, callee: UserId) {
        self.outgoing.insert(caller.clone(), callee.clone());
        self.pending.insert(callee, caller);
    }

    /// Who is ringing `callee`.
    pub fn pending_caller(&self, callee: &UserId) -> Option<&UserId> {
        self.pending.get(callee)
    }

    /// Whom `caller` is ringing.
    pub fn outgoing_call(&self, caller: &UserId) -> Option<&UserId> {
        self.outgoing.get(caller)
    }

    /// Removes the call ringing `callee`; returns its caller.
    pub fn take_pending(&mut self, callee: &UserId) -> Option<UserId> {
        let caller = self.pending.remove(callee)?;
        self.outgoing.remove(&caller);
        Some(caller)
    }

    /// Removes the call placed by `caller`; returns its callee.
    pub fn withdraw_outgoing(&mut self, caller: &UserId) -> Option<UserId> {
        let callee = self.outgoing.remove(caller)?;
        self.pending.remove(&callee);
        Some(callee)
    }

    pub fn connect(&mut self, a: UserId, b: UserId) {
        self.active.insert(a.clone(), b.clone());
        self.active.insert(b, a);
    }

    pub fn partner(&self, user_id: &UserId) -> Option<&UserId> {
        self.active.get(user_id)
    }

    /// Ends the active call of `user_id`, removing both directions; returns
    /// the partner.
    pub fn disconnect(&mut self, user_id: &UserId) -> Option<UserId> {
        let partner = self.active.remove(user_id)?;
        if self.active.get(&partner) == Some(user_id) {
            self.active.remove(&partner);
        }
        Some(partner)
    }

    /// Active wins over ringing, ringing over calling.
    pub fn state_of(&self, user_id: &UserId) -> UserState {
        if self.active.contains_key(user_id) {
            UserState::Active
        } else if self.pending.contains_key(user_id) {
            UserState::Ringing
        } else if self.outgoing.contains_key(user_id) {
            UserState::Calling
        } else {
            UserState::Idle
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of answered calls (each counted once).
    pub fn active_count(&self) -> usize {
        self.active.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.outgoing.is_empty() && self.active.is_empty()
    }

    /// Verifies the structural invariants and describes the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (a, b) in &self.active {
            if self.active.get(b) != Some(a) {
                return Err(format!("active call {} -> {} has no reverse entry", a, b));
            }
            if a == b {
                return Err(format!("{} is in a call with itself", a));
            }
            if self.pending.contains_key(a) {
                return Err(format!("{} is both active and ringing", a));
            }
            if self.outgoing.contains_key(a) {
                return Err(format!("{} is both active and calling", a));
            }
        }

        if self.pending.len() != self.outgoing.len() {
            return Err("pending and outgoing indexes differ in size".to_string());
        }
        for (callee, caller) in &self.pending {
            if self.outgoing.get(caller) != Some(callee) {
                return Err(format!(
                    "pending call {} -> {} missing from outgoing index",
                    caller, callee
                ));
            }
        }

        Ok(())
    }
}
