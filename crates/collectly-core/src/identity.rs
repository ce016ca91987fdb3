// ── Identity assignment ──
//
// Records added without a usable identity get a random token. There is
// no collision check against the store: uniqueness is probabilistic.

use uuid::Uuid;

/// Source of fresh identity values for records that arrive without one.
pub trait IdentityAssigner {
    fn assign(&self) -> String;
}

/// Default assigner: a random 36-character token, `8-4-4-4-12` lower hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentity;

impl IdentityAssigner for RandomIdentity {
    fn assign(&self) -> String {
        generate_id()
    }
}

/// Generate a fresh random identity token.
pub fn generate_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
