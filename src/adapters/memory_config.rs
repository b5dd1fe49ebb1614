//! In-memory configuration store.
//!
//! Implements [`ConfigPort`] over a byte map, storing the config as a
//! postcard blob the same way a flash-backed store would.  Used by hosts
//! without persistent storage and by tests.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

const CONFIG_KEY: &str = "aviary/syscfg";

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored blob without validation.  Simulates flash
    /// corruption in tests.
    pub fn write_raw(&self, bytes: Vec<u8>) {
        self.store.borrow_mut().insert(CONFIG_KEY.to_owned(), bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }
}

impl ConfigPort for MemoryConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let store = self.store.borrow();
        let bytes = store.get(CONFIG_KEY).ok_or(ConfigError::NotFound)?;
        let config: SystemConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        // A blob that decodes but fails validation is as unusable as one
        // that does not decode.
        if let Err(e) = config.validate() {
            warn!("MemoryConfigStore: stored config invalid: {}", e);
            return Err(ConfigError::Corrupted);
        }
        info!("MemoryConfigStore: loaded config ({} bytes)", bytes.len());
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config)
            .map_err(|_| ConfigError::Invalid("config not serialisable"))?;
        info!("MemoryConfigStore: config saved ({} bytes)", bytes.len());
        self.store.borrow_mut().insert(CONFIG_KEY.to_owned(), bytes);
        Ok(())
    }
}
