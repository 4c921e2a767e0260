//! Opaque session token generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-process counter so two tokens minted in the same nanosecond differ.
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a fresh session token.
///
/// Format: `tok_<timestamp_hex>_<mixed_hex>`. The token is an opaque handle
/// for storage consumers, not a credential.
pub fn generate_token() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mixed = timestamp
        .wrapping_mul(0x5DEECE66D)
        .wrapping_add(seq.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    format!("tok_{:x}_{:016x}", timestamp, mixed)
}
