use crate::domain::{Fingerprint, HashAlgorithm};
use crate::error::HashError;
use crate::ports::HashingPort;
use blake3::Hasher as Blake3Hasher;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hashes files block by block; memory use is one block per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingHasher;

impl StreamingHasher {
    pub fn new() -> Self {
        Self
    }

    fn process_blocks<F>(reader: &mut impl Read, block_size: usize, mut update_fn: F) -> io::Result<()>
    where
        F: FnMut(&[u8]),
    {
        let mut buffer = vec![0u8; block_size.max(1)];
        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            update_fn(&buffer[..bytes_read]);
        }
        Ok(())
    }

    fn digest(
        reader: &mut impl Read,
        algorithm: HashAlgorithm,
        block_size: usize,
    ) -> io::Result<Fingerprint> {
        match algorithm {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                Self::process_blocks(reader, block_size, |data| hasher.update(data))?;
                Ok(Fingerprint::new(hasher.finalize().to_vec()))
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = Blake3Hasher::new();
                Self::process_blocks(reader, block_size, |data| {
                    hasher.update(data);
                })?;
                Ok(Fingerprint::new(hasher.finalize().as_bytes().to_vec()))
            }
        }
    }
}

impl HashingPort for StreamingHasher {
    fn hash_file(
        &self,
        path: &Path,
        algorithm: HashAlgorithm,
        block_size: usize,
    ) -> Result<Fingerprint, HashError> {
        let unreadable = |source| HashError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(unreadable)?;
        Self::digest(&mut file, algorithm, block_size).map_err(unreadable)
    }
}
