use std::{collections::HashMap, env};

/// Sets or clears environment variables for one test and restores the
/// previous values on drop. Tests using it must be `#[serial]`.
#[derive(Default)]
pub struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    fn remember(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.remember(key);
        env::set_var(key, value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.remember(key);
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}
