//! Simulated EEPROM-like storage

use std::sync::{Arc, Mutex, MutexGuard};

use ratchet_hal::storage::Storage;
use ratchet_hal::{HalError, HalResult};

/// Simulated byte storage over a shared buffer.
///
/// Clones share the same bytes, so a "restart" is: drop the device, build a
/// new one over a clone of the same `SimStorage`.
#[derive(Debug, Clone)]
pub struct SimStorage {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SimStorage {
    /// Fresh medium of `len` bytes, erased to `0xFF` like real EEPROM.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(vec![0xFF; len])),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().expect("sim storage poisoned")
    }
}

impl Storage for SimStorage {
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn read(&self, addr: usize, buf: &mut [u8]) -> HalResult<()> {
        let bytes = self.lock();
        let end = addr.checked_add(buf.len()).ok_or(HalError::OutOfRange)?;
        if end > bytes.len() {
            return Err(HalError::OutOfRange);
        }
        buf.copy_from_slice(&bytes[addr..end]);
        Ok(())
    }

    fn write(&mut self, addr: usize, data: &[u8]) -> HalResult<()> {
        let mut bytes = self.lock();
        let end = addr.checked_add(data.len()).ok_or(HalError::OutOfRange)?;
        if end > bytes.len() {
            return Err(HalError::OutOfRange);
        }
        bytes[addr..end].copy_from_slice(data);
        Ok(())
    }
}
