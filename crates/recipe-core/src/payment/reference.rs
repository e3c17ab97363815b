use std::sync::atomic::{AtomicI64, Ordering};

use rand::distributions::Uniform;
use rand::Rng;

use crate::runtime::TimeProvider;

pub const DEFAULT_REFERENCE_PREFIX: &str = "recipe";

const SUFFIX_LEN: usize = 10;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces `{prefix}_{millis}_{suffix}` transaction references.
///
/// `millis` never repeats within one generator: when the clock has not moved
/// since the last reference it is bumped by one.
pub struct ReferenceGenerator<T: TimeProvider> {
    time_provider: T,
    last_millis: AtomicI64,
}

impl<T: TimeProvider> ReferenceGenerator<T> {
    pub fn new(time_provider: T) -> Self {
        Self {
            time_provider,
            last_millis: AtomicI64::new(i64::MIN),
        }
    }

    pub fn time_provider(&self) -> &T {
        &self.time_provider
    }

    pub fn generate(&self, prefix: &str) -> String {
        let prefix = match prefix.trim() {
            "" => DEFAULT_REFERENCE_PREFIX,
            p => p,
        };
        format!("{prefix}_{}_{}", self.next_millis(), random_suffix())
    }

    fn next_millis(&self) -> i64 {
        let now = self.time_provider.unix_timestamp_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(if now > last { now } else { last + 1 })
            })
            .unwrap_or_else(|last| last);
        if now > previous {
            now
        } else {
            previous + 1
        }
    }
}

fn random_suffix() -> String {
    let index = Uniform::from(0..SUFFIX_ALPHABET.len());
    rand::thread_rng()
        .sample_iter(index)
        .take(SUFFIX_LEN)
        .map(|i| SUFFIX_ALPHABET[i] as char)
        .collect()
}
