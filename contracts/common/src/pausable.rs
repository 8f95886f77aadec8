use soroban_sdk::{symbol_short, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────

pub fn pause_key() -> Symbol {
    symbol_short!("PAUSED")
}

// ── Core Functions ───────────────────────────────────────────

/// Returns the global pause flag. An unset flag reads as unpaused.
pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&pause_key()).unwrap_or(false)
}

/// Engages or releases the global circuit breaker.
/// Callers must check the owner capability first.
pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&pause_key(), &paused);
}

/// True while normal operations are allowed.
pub fn require_not_paused(env: &Env) -> bool {
    !is_paused(env)
}

/// True only while the breaker is engaged. Used by escape hatches.
pub fn require_paused(env: &Env) -> bool {
    is_paused(env)
}
