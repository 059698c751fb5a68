//! Streaming content hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use shelfscan_core::{ContentHash, HashAlgorithm};

/// Read buffer size for hashing.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hash a file's full contents.
///
/// Returns the digest and the number of bytes read.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> io::Result<(ContentHash, u64)> {
    let file = File::open(path)?;
    hash_reader(file, algorithm)
}

/// Hash everything readable from `reader`.
pub fn hash_reader<R: Read>(reader: R, algorithm: HashAlgorithm) -> io::Result<(ContentHash, u64)> {
    match algorithm {
        HashAlgorithm::Md5 => {
            let mut context = md5::Context::new();
            let bytes = for_each_chunk(reader, |chunk| context.consume(chunk))?;
            Ok((ContentHash::from_bytes(&context.compute().0), bytes))
        }
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            let bytes = for_each_chunk(reader, |chunk| {
                hasher.update(chunk);
            })?;
            Ok((ContentHash::from_bytes(hasher.finalize().as_bytes()), bytes))
        }
    }
}

fn for_each_chunk<R: Read>(mut reader: R, mut f: impl FnMut(&[u8])) -> io::Result<u64> {
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        f(&buffer[..n]);
        total += n as u64;
    }
}
