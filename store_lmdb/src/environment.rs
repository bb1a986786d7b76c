//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbPollStore};

const POLLS_DB: &str = "polls";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    polls_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per directory by this
        // process, and the memory map is never touched outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(2)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let polls_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(POLLS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB poll index");
        Ok(Self {
            env: Arc::new(env),
            polls_db,
            meta_db,
        })
    }

    /// A poll store sharing this environment.
    pub fn poll_store(&self) -> LmdbPollStore {
        LmdbPollStore {
            env: Arc::clone(&self.env),
            polls_db: self.polls_db,
            meta_db: self.meta_db,
        }
    }
}
