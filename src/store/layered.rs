use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::persistence::Persistence;

/// Local store plus an optional remote. Reads prefer the remote and fall back
/// to local; writes always land locally and go to the remote when there is one.
pub struct Storage {
    local: Box<dyn Persistence>,
    remote: Option<Box<dyn Persistence>>,
}

impl Storage {
    pub fn new(local: Box<dyn Persistence>, remote: Option<Box<dyn Persistence>>) -> Self {
        Self { local, remote }
    }

    pub fn local_only(local: Box<dyn Persistence>) -> Self {
        Self::new(local, None)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Remote first; absent, unreachable or undecodable remote data falls
    /// through to the local copy.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(remote) = &self.remote {
            match remote.load(key) {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(value) => return Some(value),
                    Err(e) => log::warn!("remote {key} did not decode: {e}"),
                },
                Ok(None) => log::debug!("remote has no {key}"),
                Err(e) => log::warn!("remote load of {key} failed: {e:#}"),
            }
        }
        Self::decode(self.local.as_ref(), key)
    }

    pub fn load_json_local<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        Self::decode(self.local.as_ref(), key)
    }

    fn decode<T: DeserializeOwned>(store: &dyn Persistence, key: &str) -> Option<T> {
        match store.load(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("local {key} did not decode: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("local load of {key} failed: {e:#}");
                None
            }
        }
    }

    /// Local write is authoritative for the result; a remote failure is only
    /// logged.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.local.save(key, &raw)?;
        if let Some(remote) = &self.remote
            && let Err(e) = remote.save(key, &raw)
        {
            log::warn!("remote save of {key} failed: {e:#}");
        }
        Ok(())
    }

    pub fn save_json_local<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.local.save(key, &raw)
    }

    pub fn remove_local(&self, key: &str) -> Result<()> {
        self.local.remove(key)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.local.remove(key)?;
        if let Some(remote) = &self.remote
            && let Err(e) = remote.remove(key)
        {
            log::warn!("remote remove of {key} failed: {e:#}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;
    use crate::store::persistence::MemoryStore;

    struct Unreachable;

    impl Persistence for Unreachable {
        fn save(&self, _key: &str, _value: &str) -> Result<()> {
            bail!("offline")
        }
        fn load(&self, _key: &str) -> Result<Option<String>> {
            bail!("offline")
        }
        fn remove(&self, _key: &str) -> Result<()> {
            bail!("offline")
        }
    }

    fn layered() -> (Rc<MemoryStore>, Rc<MemoryStore>, Storage) {
        let local = Rc::new(MemoryStore::new());
        let remote = Rc::new(MemoryStore::new());
        let storage = Storage::new(Box::new(Rc::clone(&local)), Some(Box::new(Rc::clone(&remote))));
        (local, remote, storage)
    }

    #[test]
    fn test_has_remote() {
        let (_local, _remote, storage) = layered();
        assert!(storage.has_remote());
        assert!(!Storage::local_only(Box::new(MemoryStore::new())).has_remote());
    }

    #[test]
    fn test_remote_wins_when_present() {
        let (local, remote, storage) = layered();
        local.save("n", "1").unwrap();
        remote.save("n", "2").unwrap();
        assert_eq!(storage.load_json::<u32>("n"), Some(2));
        assert_eq!(storage.load_json_local::<u32>("n"), Some(1));
    }

    #[test]
    fn test_falls_back_to_local_when_remote_missing_or_corrupt() {
        let (local, remote, storage) = layered();
        local.save("n", "1").unwrap();
        assert_eq!(storage.load_json::<u32>("n"), Some(1));

        remote.save("n", "not json").unwrap();
        assert_eq!(storage.load_json::<u32>("n"), Some(1));
    }

    #[test]
    fn test_offline_remote_still_saves_locally() {
        let local = Rc::new(MemoryStore::new());
        let storage = Storage::new(Box::new(Rc::clone(&local)), Some(Box::new(Unreachable)));
        storage.save_json("n", &5u32).unwrap();
        assert!(local.contains("n"));
        assert_eq!(storage.load_json::<u32>("n"), Some(5));
        storage.remove("n").unwrap();
        assert!(!local.contains("n"));
    }

    #[test]
    fn test_save_writes_both_layers() {
        let (local, remote, storage) = layered();
        storage.save_json("n", &3u32).unwrap();
        assert!(local.contains("n"));
        assert!(remote.contains("n"));

        storage.save_json_local("m", &4u32).unwrap();
        assert!(local.contains("m"));
        assert!(!remote.contains("m"));
    }
}
