use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Records `owner` as the sole holder of the owner capability.
/// Only callable internally; callers must verify authorization beforehand.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

/// Returns the current owner, or `None` once ownership has been renounced.
pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Returns true if `caller` is the current owner.
///
/// Always false after `renounce_ownership`, which permanently disables every
/// owner-gated operation.
pub fn is_owner(env: &Env, caller: &Address) -> bool {
    match get_owner(env) {
        Some(owner) => owner == *caller,
        None => false,
    }
}

// ── Transfer / Renounce ──────────────────────────────────────────────────────

/// Hands the owner capability to `new_owner`.
///
/// The caller must have already been authenticated via `require_auth()`.
/// Returns `false` if the caller is not the current owner.
pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) -> bool {
    if !is_owner(env, caller) {
        return false;
    }
    set_owner(env, new_owner);
    true
}

/// Drops the owner capability entirely.
///
/// Returns `false` if the caller is not the current owner.
pub fn renounce_ownership(env: &Env, caller: &Address) -> bool {
    if !is_owner(env, caller) {
        return false;
    }
    env.storage().instance().remove(&OWNER);
    true
}
