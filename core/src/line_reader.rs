//! The Line Reader (spec.md §4.1): turns an arbitrary byte source into a
//! lazy sequence of `(line, line_number)` records.

use std::collections::VecDeque;
use std::io::{self, Read};

use crate::options::LineReaderOptions;

const READ_CHUNK: usize = 64 * 1024;

/// One logical line, decoded and stripped of its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub line_number: usize,
    /// Set on the first piece of a line that had to be split because it
    /// exceeded `max_line_length` (spec.md §4.1). The stream engine uses
    /// this to synthesize the overflow `Error` event.
    pub overflowed: bool,
}

/// Converts a byte [`Read`] source into a pull-based sequence of
/// [`LineRecord`]s. Splits on `\n`, `\r\n`, or bare `\r`; joins chunks that
/// don't end on a terminator; replaces invalid UTF-8 with U+FFFD; enforces
/// `max_line_length` by splitting oversize lines; and skips
/// empty/whitespace-only lines without consuming a line number.
pub struct LineReader<R> {
    source: R,
    buf: Vec<u8>,
    eof: bool,
    next_number: usize,
    opts: LineReaderOptions,
    pending: VecDeque<LineRecord>,
}

impl<R: Read> LineReader<R> {
    pub fn new(source: R, opts: LineReaderOptions) -> Self {
        Self {
            source,
            buf: Vec::new(),
            eof: false,
            next_number: 0,
            opts,
            pending: VecDeque::new(),
        }
    }

    /// Pulls the next logical line, reading from the underlying source as
    /// needed. Returns `Ok(None)` at end of stream.
    pub fn next_record(&mut self) -> io::Result<Option<LineRecord>> {
        loop {
            if let Some(rec) = self.pending.pop_front() {
                return Ok(Some(rec));
            }

            if let Some((raw, consumed)) = find_terminated_line(&self.buf) {
                self.buf.drain(0..consumed);
                self.queue_line(raw);
                continue;
            }

            if self.eof {
                if !self.buf.is_empty() {
                    let remaining = std::mem::take(&mut self.buf);
                    self.queue_line(remaining);
                    continue;
                }
                return Ok(None);
            }

            let mut chunk = vec![0u8; READ_CHUNK];
            let n = self.source.read(&mut chunk)?;
            if n == 0 {
                self.eof = true;
                continue;
            }
            chunk.truncate(n);
            self.buf.extend_from_slice(&chunk);
        }
    }

    /// Splits one raw (terminator-stripped) logical line into one or more
    /// `LineRecord`s, honoring `max_line_length` and the blank-line skip.
    fn queue_line(&mut self, raw: Vec<u8>) {
        let text = String::from_utf8_lossy(&raw).into_owned();
        if text.is_empty() {
            return;
        }

        let max = self.opts.max_line_length.max(1);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return;
        }

        let overflowed_whole = chars.len() > max;
        let mut start = 0;
        let mut first_piece = true;
        while start < chars.len() {
            let end = (start + max).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let is_first = first_piece;
            first_piece = false;
            start = end;

            if piece.trim().is_empty() {
                continue;
            }

            self.next_number += 1;
            self.pending.push_back(LineRecord {
                text: piece,
                line_number: self.next_number,
                overflowed: overflowed_whole && is_first,
            });
        }
    }
}

/// Looks for the first `\n`, `\r\n`, or bare `\r` in `buf`. Returns the raw
/// content before the terminator and how many bytes (content + terminator)
/// were consumed. A trailing lone `\r` with nothing after it is ambiguous
/// (it might be the start of `\r\n` split across reads) and is left
/// unresolved until more data arrives or EOF forces a flush.
fn find_terminated_line(buf: &[u8]) -> Option<(Vec<u8>, usize)> {
    if let Some(pos) = memchr::memchr(b'\n', buf) {
        if pos > 0 && buf[pos - 1] == b'\r' {
            return Some((buf[..pos - 1].to_vec(), pos + 1));
        }
        return Some((buf[..pos].to_vec(), pos + 1));
    }

    if let Some(pos) = memchr::memchr(b'\r', buf) {
        if pos + 1 < buf.len() {
            return Some((buf[..pos].to_vec(), pos + 1));
        }
    }

    None
}
