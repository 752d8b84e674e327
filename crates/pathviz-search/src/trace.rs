//! Binary event traces.
//!
//! Provides [`TraceEncoder`] and [`TraceDecoder`] for writing a run's
//! [`StepEvent`]s to a byte stream, so that two runs can be compared byte for
//! byte or a run can be replayed without searching again.
//!
//! ## Wire format
//!
//! Each event is a one-byte tag followed by its payload, all integers
//! little-endian:
//! ```text
//! 0 expanded     [x: i32] [y: i32]
//! 1 discovered   [x: i32] [y: i32] [cost: i32]
//! 2 updated      [x: i32] [y: i32] [cost: i32]
//! 3 succeeded    [len: u32] then len × ([x: i32] [y: i32])
//! 4 failed
//! ```

use std::io::{self, Read, Write};

use pathviz_core::Point;

use crate::event::StepEvent;

const TAG_EXPANDED: u8 = 0;
const TAG_DISCOVERED: u8 = 1;
const TAG_UPDATED: u8 = 2;
const TAG_SUCCEEDED: u8 = 3;
const TAG_FAILED: u8 = 4;

// ---------------------------------------------------------------------------
// TraceEncoder
// ---------------------------------------------------------------------------

/// Encodes [`StepEvent`]s to a byte-oriented writer.
pub struct TraceEncoder<W: Write> {
    writer: W,
}

impl<W: Write> TraceEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single event.
    pub fn encode(&mut self, event: &StepEvent) -> io::Result<()> {
        match event {
            StepEvent::NodeExpanded(p) => {
                self.writer.write_all(&[TAG_EXPANDED])?;
                self.write_point(*p)
            }
            StepEvent::NodeDiscovered { pos, cost } => {
                self.writer.write_all(&[TAG_DISCOVERED])?;
                self.write_point(*pos)?;
                self.writer.write_all(&cost.to_le_bytes())
            }
            StepEvent::NodeUpdated { pos, cost } => {
                self.writer.write_all(&[TAG_UPDATED])?;
                self.write_point(*pos)?;
                self.writer.write_all(&cost.to_le_bytes())
            }
            StepEvent::SearchSucceeded(path) => {
                let len = u32::try_from(path.len())
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path too long"))?;
                self.writer.write_all(&[TAG_SUCCEEDED])?;
                self.writer.write_all(&len.to_le_bytes())?;
                for &p in path {
                    self.write_point(p)?;
                }
                Ok(())
            }
            StepEvent::SearchFailed => self.writer.write_all(&[TAG_FAILED]),
        }
    }

    /// Write every event of a sequence.
    pub fn encode_all<'a>(&mut self, events: impl IntoIterator<Item = &'a StepEvent>) -> io::Result<()> {
        for e in events {
            self.encode(e)?;
        }
        Ok(())
    }

    fn write_point(&mut self, p: Point) -> io::Result<()> {
        self.writer.write_all(&p.x.to_le_bytes())?;
        self.writer.write_all(&p.y.to_le_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the encoder, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode a whole event sequence into a byte vector.
///
/// Fails with [`io::ErrorKind::InvalidInput`] if a path is longer than the
/// format's `u32` length prefix allows.
pub fn encode_trace(events: &[StepEvent]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    TraceEncoder::new(&mut buf).encode_all(events)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// TraceDecoder
// ---------------------------------------------------------------------------

/// Decodes [`StepEvent`]s from a byte-oriented reader.
pub struct TraceDecoder<R: Read> {
    reader: R,
}

impl<R: Read> TraceDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next event, or `None` at EOF.
    pub fn decode(&mut self) -> io::Result<Option<StepEvent>> {
        let mut tag = [0u8; 1];
        match self.reader.read_exact(&mut tag) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let event = match tag[0] {
            TAG_EXPANDED => StepEvent::NodeExpanded(self.read_point()?),
            TAG_DISCOVERED => StepEvent::NodeDiscovered {
                pos: self.read_point()?,
                cost: self.read_i32()?,
            },
            TAG_UPDATED => StepEvent::NodeUpdated {
                pos: self.read_point()?,
                cost: self.read_i32()?,
            },
            TAG_SUCCEEDED => {
                let mut len_buf = [0u8; 4];
                self.reader.read_exact(&mut len_buf)?;
                let len = u32::from_le_bytes(len_buf) as usize;
                let mut path = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    path.push(self.read_point()?);
                }
                StepEvent::SearchSucceeded(path)
            }
            TAG_FAILED => StepEvent::SearchFailed,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown trace tag {other}"),
                ));
            }
        };
        Ok(Some(event))
    }

    /// Read every remaining event.
    pub fn decode_all(&mut self) -> io::Result<Vec<StepEvent>> {
        let mut events = Vec::new();
        while let Some(e) = self.decode()? {
            events.push(e);
        }
        Ok(events)
    }

    fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_point(&mut self) -> io::Result<Point> {
        let x = self.read_i32()?;
        let y = self.read_i32()?;
        Ok(Point::new(x, y))
    }

    /// Consume the decoder, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use pathviz_core::Grid;

    #[test]
    fn expanded_event_layout() {
        let bytes = encode_trace(&[StepEvent::NodeExpanded(Point::new(2, -1))]).unwrap();
        assert_eq!(bytes, vec![0, 2, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn run_trace_decodes_back() {
        let g = Grid::from_layout("S.#\n..#\n...\n#.E").unwrap();
        let mut e = Engine::new();
        e.start(&g).unwrap();
        let events = e.run_to_completion(&g).unwrap();

        let bytes = encode_trace(&events).unwrap();
        let decoded = TraceDecoder::new(bytes.as_slice()).decode_all().unwrap();
        assert_eq!(decoded, events);
    }

    #[test]
    fn failed_and_empty_path() {
        let events = vec![StepEvent::SearchSucceeded(vec![]), StepEvent::SearchFailed];
        let mut buf = Vec::new();
        {
            let mut enc = TraceEncoder::new(&mut buf);
            enc.encode_all(&events).unwrap();
            enc.flush().unwrap();
        }
        assert_eq!(buf, vec![3, 0, 0, 0, 0, 4]);

        let mut dec = TraceDecoder::new(buf.as_slice());
        assert_eq!(dec.decode().unwrap(), Some(StepEvent::SearchSucceeded(vec![])));
        assert_eq!(dec.decode().unwrap(), Some(StepEvent::SearchFailed));
        assert!(dec.decode().unwrap().is_none());
    }

    #[test]
    fn writer_errors_propagate() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::StorageFull, "full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut enc = TraceEncoder::new(Full);
        let err = enc
            .encode_all(&[StepEvent::NodeExpanded(Point::ZERO), StepEvent::SearchFailed])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn unknown_tag_is_invalid_data() {
        let err = TraceDecoder::new(&[9u8][..]).decode().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut bytes = encode_trace(&[StepEvent::NodeUpdated {
            pos: Point::new(1, 1),
            cost: 7,
        }])
        .unwrap();
        bytes.pop();
        let err = TraceDecoder::new(bytes.as_slice()).decode().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
