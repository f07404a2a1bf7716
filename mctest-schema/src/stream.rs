//! Length-prefixed record streams.
//!
//! A stream is a plain concatenation of frames, each a 4-byte little-endian
//! body length followed by one encoded record. This is the layout of the
//! `.proto` corpus files, so a whole dataset split is one stream.

use std::io::{ErrorKind, Read, Write};
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::error::{Result, SchemaError};
use crate::message::Message;

const PREFIX_LEN: usize = 4;

/// Write one record as a length-prefixed frame with the default [`CodecConfig`].
///
/// Frames over the default `max_frame_len` are refused, so anything written
/// here reads back through [`DelimitedReader::new`].
pub fn write_delimited<W: Write, M: Message>(writer: &mut W, record: &M) -> Result<()> {
    write_delimited_with_config(writer, record, &CodecConfig::default())
}

/// Write one record as a length-prefixed frame.
///
/// # Errors
///
/// Returns [`SchemaError::FrameTooLarge`] if the encoded record is longer than
/// `config.max_frame_len`, or [`SchemaError::Io`] if the writer fails.
pub fn write_delimited_with_config<W: Write, M: Message>(
    writer: &mut W,
    record: &M,
    config: &CodecConfig,
) -> Result<()> {
    let len = record.encoded_len();
    if len > config.max_frame_len {
        return Err(SchemaError::FrameTooLarge { len, max: config.max_frame_len });
    }
    let prefix = u32::try_from(len)
        .map_err(|_| SchemaError::FrameTooLarge { len, max: u32::MAX as usize })?;
    writer.write_all(&prefix.to_le_bytes())?;
    writer.write_all(&record.encode())?;
    Ok(())
}

/// Read every record of a stream with the default [`CodecConfig`].
pub fn read_delimited<R: Read, M: Message>(reader: R) -> Result<Vec<M>> {
    DelimitedReader::new(reader).collect()
}

/// Iterator over the records of a length-prefixed stream.
///
/// Yields `Err` at most once; the iterator is finished after any error.
///
/// # Example
///
/// ```rust,ignore
/// use mctest_schema::{DelimitedReader, StoryAsWords};
///
/// let file = std::fs::File::open("mc160.dev.proto")?;
/// for story in DelimitedReader::<_, StoryAsWords>::new(std::io::BufReader::new(file)) {
///     println!("{}", story?.id);
/// }
/// ```
#[derive(Debug)]
pub struct DelimitedReader<R, M> {
    reader: R,
    config: CodecConfig,
    frames: usize,
    finished: bool,
    _record: PhantomData<fn() -> M>,
}

impl<R: Read, M: Message> DelimitedReader<R, M> {
    /// Create a reader with the default [`CodecConfig`].
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, CodecConfig::default())
    }

    /// Create a reader with an explicit [`CodecConfig`].
    pub fn with_config(reader: R, config: CodecConfig) -> Self {
        Self { reader, config, frames: 0, finished: false, _record: PhantomData }
    }

    /// Number of records decoded so far.
    pub fn frames_read(&self) -> usize {
        self.frames
    }

    /// Return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_prefix(&mut self) -> Result<Option<usize>> {
        let mut prefix = [0u8; PREFIX_LEN];
        let mut filled = 0;
        while filled < PREFIX_LEN {
            match self.reader.read(&mut prefix[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            PREFIX_LEN => Ok(Some(u32::from_le_bytes(prefix) as usize)),
            partial if self.config.allow_trailing_bytes => {
                warn!(
                    record = M::NAME,
                    frames = self.frames,
                    trailing = partial,
                    "ignoring trailing bytes after last record"
                );
                Ok(None)
            }
            partial => Err(SchemaError::MalformedInput {
                message: M::NAME,
                reason: format!("{partial} trailing bytes after frame {}", self.frames),
            }),
        }
    }

    fn read_record(&mut self) -> Result<Option<M>> {
        let Some(len) = self.read_prefix()? else {
            return Ok(None);
        };
        if len > self.config.max_frame_len {
            return Err(SchemaError::FrameTooLarge { len, max: self.config.max_frame_len });
        }

        let mut body = vec![0u8; len];
        self.reader.read_exact(&mut body).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                SchemaError::MalformedInput {
                    message: M::NAME,
                    reason: format!("frame {} truncated: expected {len} bytes", self.frames),
                }
            } else {
                SchemaError::Io(e)
            }
        })?;

        let record = M::decode(&body)?;
        debug!(record = M::NAME, frame = self.frames, len, "decoded delimited record");
        self.frames += 1;
        Ok(Some(record))
    }
}

impl<R: Read, M: Message> Iterator for DelimitedReader<R, M> {
    type Item = Result<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
