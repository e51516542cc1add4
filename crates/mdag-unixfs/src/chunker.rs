//! Fixed-size chunker over any [`Read`] source.

use std::io::{self, Read};

use crate::config::MAX_CHUNK_SIZE;
use crate::error::{UnixfsError, UnixfsResult};

/// Capacity reserved up front for a chunk; the buffer grows past this only
/// as data actually arrives.
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Splits a byte stream into chunks of exactly `chunk_size` bytes.
///
/// The last chunk holds the remainder and may be shorter, but is never
/// empty. An empty source produces no chunks. Chunks are read lazily, one
/// per call to `next`, so nothing beyond the current chunk is buffered.
///
/// A read error is yielded once and ends the sequence.
pub struct Chunker<R> {
    reader: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> Chunker<R> {
    /// Chunk `reader` into pieces of `chunk_size` bytes.
    pub fn new(reader: R, chunk_size: usize) -> UnixfsResult<Self> {
        if chunk_size == 0 {
            return Err(UnixfsError::InvalidConfig("chunk_size must be positive".into()));
        }
        if chunk_size > MAX_CHUNK_SIZE {
            return Err(UnixfsError::InvalidConfig(format!(
                "chunk_size must be at most {MAX_CHUNK_SIZE}, got {chunk_size}"
            )));
        }
        Ok(Self {
            reader,
            chunk_size,
            done: false,
        })
    }

    /// The configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(self.chunk_size.min(INITIAL_CAPACITY));
        // Short and interrupted reads are retried until the chunk is full or
        // the source is exhausted.
        (&mut self.reader)
            .take(self.chunk_size as u64)
            .read_to_end(&mut buf)?;

        if buf.len() < self.chunk_size {
            self.done = true;
        }
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(buf))
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_chunk() {
            Ok(chunk) => chunk.map(Ok),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(data: &[u8], size: usize) -> Vec<Vec<u8>> {
        Chunker::new(data, size)
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    /// Yields at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Fails after `ok_reads` successful reads.
    struct Failing {
        ok_reads: usize,
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.ok_reads == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "source went away"));
            }
            self.ok_reads -= 1;
            buf.fill(1);
            Ok(buf.len())
        }
    }

    /// Interrupts every other read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn empty_source_yields_nothing() {
        assert!(chunks(b"", 4).is_empty());
    }

    #[test]
    fn exact_multiple() {
        let out = chunks(b"abcdefgh", 4);
        assert_eq!(out, vec![b"abcd".to_vec(), b"efgh".to_vec()]);
    }

    #[test]
    fn remainder_goes_last() {
        let out = chunks(b"abcdefghij", 4);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], b"ij");
    }

    #[test]
    fn smaller_than_one_chunk() {
        assert_eq!(chunks(b"abc", 1024), vec![b"abc".to_vec()]);
    }

    #[test]
    fn short_reads_are_coalesced() {
        let data: Vec<u8> = (0..100u8).collect();
        let reader = Trickle { data: &data, step: 3 };
        let out: Vec<_> = Chunker::new(reader, 32)
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(out.iter().map(Vec::len).collect::<Vec<_>>(), vec![32, 32, 32, 4]);
        assert_eq!(out.concat(), data);
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let reader = Flaky {
            data: b"0123456789",
            interrupt: false,
        };
        let out: Vec<_> = Chunker::new(reader, 4)
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(out.concat(), b"0123456789");
    }

    #[test]
    fn read_error_surfaces_once_and_ends() {
        let mut chunker = Chunker::new(Failing { ok_reads: 1 }, 8).unwrap();
        assert_eq!(chunker.next().unwrap().unwrap(), vec![1u8; 8]);
        let err = chunker.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(chunker.next().is_none());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(matches!(
            Chunker::new(&b"x"[..], 0),
            Err(UnixfsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_chunk_size_rejected() {
        assert!(Chunker::new(&b"x"[..], MAX_CHUNK_SIZE).is_ok());
        assert!(matches!(
            Chunker::new(&b"x"[..], MAX_CHUNK_SIZE + 1),
            Err(UnixfsError::InvalidConfig(_))
        ));
        assert!(matches!(
            Chunker::new(&b"x"[..], usize::MAX),
            Err(UnixfsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn small_input_does_not_reserve_whole_chunk() {
        let mut chunker = Chunker::new(&b"abc"[..], MAX_CHUNK_SIZE).unwrap();
        let chunk = chunker.next().unwrap().unwrap();
        assert_eq!(chunk, b"abc");
        assert!(chunk.capacity() < MAX_CHUNK_SIZE);
        assert!(chunker.next().is_none());
    }

    #[test]
    fn full_chunks_grow_past_initial_capacity() {
        let data: Vec<u8> = (0..3 * INITIAL_CAPACITY).map(|i| i as u8).collect();
        let reader = Trickle { data: &data, step: 4096 };
        let out: Vec<_> = Chunker::new(reader, 2 * INITIAL_CAPACITY)
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(out.iter().map(Vec::len).collect::<Vec<_>>(), vec![2 * INITIAL_CAPACITY, INITIAL_CAPACITY]);
        assert_eq!(out.concat(), data);
    }

    #[test]
    fn reads_lazily() {
        let mut chunker = Chunker::new(Failing { ok_reads: 2 }, 8).unwrap();
        // nothing is read until the first chunk is requested
        assert_eq!(chunker.chunk_size(), 8);
        assert!(chunker.next().unwrap().is_ok());
        assert!(chunker.next().unwrap().is_ok());
        assert!(chunker.next().unwrap().is_err());
    }
}
