//! # Owner Access Check
//!
//! Every privileged election operation runs the same gate: the caller must
//! be the recorded owner. The check runs first, before any other
//! precondition and before any mutation, so a rejected caller observes
//! nothing and changes nothing.

use tally_protocol::Identity;
use thiserror::Error;
use tracing::warn;

/// The caller is not the owner of the resource it tried to mutate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unauthorized: {caller} is not the owner")]
pub struct NotOwner {
    /// The identity that attempted the operation.
    pub caller: Identity,
}

/// Something with a single, immutable owner.
pub trait Ownable {
    /// The recorded owner.
    fn owner(&self) -> &Identity;

    /// Fails with [`NotOwner`] unless `caller` is the owner.
    fn ensure_owner(&self, caller: &Identity) -> Result<(), NotOwner> {
        if caller == self.owner() {
            return Ok(());
        }
        warn!(%caller, owner = %self.owner(), "owner check rejected caller");
        Err(NotOwner {
            caller: caller.clone(),
        })
    }

    /// `true` if `identity` is the owner.
    fn is_owner(&self, identity: &Identity) -> bool {
        identity == self.owner()
    }
}
