//! 分块求和示例
//! 按字节块读取以空白分隔的整数，展示数据暂时耗尽后的恢复。

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use feed_framework::{Feed, Stream};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Outcome of reading one integer from a byte feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    Value(i64),
    /// The number may continue in data that has not arrived yet.
    Pending,
    /// Bytes that are neither whitespace nor part of a number.
    Invalid(u8),
    /// The literal does not fit in an `i64`.
    Overflow,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SumError {
    #[error("unexpected byte {0:?} in input")]
    Invalid(char),
    #[error("integer overflow")]
    Overflow,
}

/// Reads the next integer, rolling back to where it started when the feed
/// runs dry before the number is terminated.
///
/// Digits are folded toward the literal's sign, so `i64::MIN` parses.
/// On `Overflow` the cursor is left inside the literal.
pub fn next_int<F: Feed<Item = u8>>(feed: &mut F) -> Parsed {
    while let Some(b) = feed.peek() {
        if !b.is_ascii_whitespace() {
            break;
        }
        feed.advance();
    }
    if feed.is_finished() {
        return Parsed::Done;
    }
    if feed.is_exhausted() {
        return Parsed::Pending;
    }

    let start = feed.checkpoint();
    let negative = feed.peek() == Some(&b'-');
    if negative {
        feed.advance();
    }

    let mut value: i64 = 0;
    let mut digits = 0;
    loop {
        match feed.peek() {
            Some(b) if b.is_ascii_digit() => {
                let digit = i64::from(b - b'0');
                let next = value.checked_mul(10).and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                });
                let Some(next) = next else {
                    return Parsed::Overflow;
                };
                value = next;
                digits += 1;
                feed.advance();
            }
            Some(_) => break,
            None if feed.is_finished() => break,
            None => {
                feed.rollback(&start);
                return Parsed::Pending;
            }
        }
    }

    if digits == 0 {
        feed.rollback(&start);
        let b = *feed.read();
        feed.advance();
        return Parsed::Invalid(b);
    }
    Parsed::Value(value)
}

/// Sums every integer, handing `source` to the stream `chunk_size` bytes at a time.
pub fn sum_in_chunks(source: &[u8], chunk_size: usize) -> Result<i64, SumError> {
    let mut stream: Stream<u8> = Stream::new();
    let mut total = 0i64;
    let mut chunks = source.chunks(chunk_size.max(1));

    loop {
        match next_int(&mut stream) {
            Parsed::Value(v) => total = total.checked_add(v).ok_or(SumError::Overflow)?,
            Parsed::Pending => match chunks.next() {
                Some(chunk) => {
                    debug!(len = chunk.len(), buffered = stream.buffered(), "feeding chunk");
                    stream.append(chunk.to_vec());
                }
                None => stream.finish(),
            },
            Parsed::Invalid(b) => return Err(SumError::Invalid(char::from(b))),
            Parsed::Overflow => return Err(SumError::Overflow),
            Parsed::Done => return Ok(total),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "chunked-sum", about = "Sum integers delivered in byte chunks")]
struct Args {
    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// Bytes per chunk
    #[arg(long, default_value_t = 4)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let source = match &args.input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    match sum_in_chunks(&source, args.chunk_size) {
        Ok(total) => {
            info!(bytes = source.len(), chunk_size = args.chunk_size, "summed");
            println!("{}", total);
            Ok(())
        }
        Err(err) => bail!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_framework::adapt_range;

    #[test]
    fn test_sum_any_chunk_size() {
        let input = b"12 -3\n 400  7 ";
        for size in 1..=input.len() {
            assert_eq!(sum_in_chunks(input, size), Ok(416), "chunk size {}", size);
        }
    }

    #[test]
    fn test_number_split_across_chunks() {
        let mut stream: Stream<u8> = Stream::new();
        stream.append(b"12".to_vec());
        assert_eq!(next_int(&mut stream), Parsed::Pending);
        assert_eq!(stream.offset(), 0);

        stream.append(b"34 ".to_vec());
        assert_eq!(next_int(&mut stream), Parsed::Value(1234));
        assert_eq!(next_int(&mut stream), Parsed::Pending);

        stream.finish();
        assert_eq!(next_int(&mut stream), Parsed::Done);
    }

    #[test]
    fn test_complete_range() {
        let mut feed = adapt_range(b"5 6".iter().copied());
        assert_eq!(next_int(&mut feed), Parsed::Value(5));
        assert_eq!(next_int(&mut feed), Parsed::Value(6));
        assert_eq!(next_int(&mut feed), Parsed::Done);
    }

    #[test]
    fn test_invalid_byte() {
        assert_eq!(sum_in_chunks(b"1 x", 2), Err(SumError::Invalid('x')));
        assert_eq!(
            SumError::Invalid('x').to_string(),
            "unexpected byte 'x' in input"
        );
    }

    #[test]
    fn test_total_overflow() {
        for size in [1, 4, 32] {
            assert_eq!(
                sum_in_chunks(b"9223372036854775807 1", size),
                Err(SumError::Overflow),
                "chunk size {}",
                size
            );
        }
        assert_eq!(
            sum_in_chunks(b"-9223372036854775808 -1", 4),
            Err(SumError::Overflow)
        );
    }

    #[test]
    fn test_literal_overflow() {
        assert_eq!(
            sum_in_chunks(b"99999999999999999999", 4),
            Err(SumError::Overflow)
        );

        let mut feed = adapt_range(b"9223372036854775808".iter().copied());
        assert_eq!(next_int(&mut feed), Parsed::Overflow);
    }

    #[test]
    fn test_integer_limits() {
        assert_eq!(sum_in_chunks(b"9223372036854775807", 3), Ok(i64::MAX));
        assert_eq!(sum_in_chunks(b"-9223372036854775808", 3), Ok(i64::MIN));
        assert_eq!(
            sum_in_chunks(b"9223372036854775807 -9223372036854775808", 5),
            Ok(-1)
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sum_in_chunks(b"", 3), Ok(0));
        assert_eq!(sum_in_chunks(b"   ", 1), Ok(0));
    }
}
