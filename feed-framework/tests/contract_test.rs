//! 契约违反测试：前置条件失败时立即 panic

use feed_framework::{adapt_range, Feed, Stream};

#[test]
#[should_panic(expected = "precondition violated: stream is closed")]
fn test_append_after_finish_panics() {
    let mut stream: Stream<i32> = Stream::new();
    stream.finish();
    stream.append(vec![1]);
}

#[test]
#[should_panic(expected = "precondition violated: stream is closed")]
fn test_finish_twice_panics() {
    let mut stream: Stream<i32> = Stream::new();
    stream.append(vec![1]);
    stream.finish();
    stream.finish();
}

#[test]
#[should_panic(expected = "precondition violated: feed is finished")]
fn test_range_read_past_end_panics() {
    let feed = adapt_range(Vec::<i32>::new());
    let _ = feed.read();
}

#[test]
#[cfg_attr(
    not(any(
        feature = "check-preconditions",
        all(debug_assertions, not(feature = "unchecked"))
    )),
    ignore
)]
#[should_panic(expected = "precondition violated: feed is finished")]
fn test_read_finished_stream_panics() {
    let mut stream: Stream<i32> = Stream::new();
    stream.append(vec![1]);
    stream.finish();
    stream.advance();
    let _ = stream.read();
}

#[test]
#[cfg_attr(
    not(any(
        feature = "check-preconditions",
        all(debug_assertions, not(feature = "unchecked"))
    )),
    ignore
)]
#[should_panic(expected = "precondition violated: feed is finished")]
fn test_advance_finished_stream_panics() {
    let mut stream: Stream<i32> = Stream::new();
    stream.finish();
    stream.advance();
}

#[test]
#[cfg_attr(
    not(any(
        feature = "check-preconditions",
        all(debug_assertions, not(feature = "unchecked"))
    )),
    ignore
)]
#[should_panic(expected = "precondition violated: feed is exhausted")]
fn test_read_pending_stream_panics() {
    let stream: Stream<i32> = Stream::new();
    let _ = stream.read();
}

#[test]
#[cfg_attr(
    not(any(
        feature = "check-preconditions",
        all(debug_assertions, not(feature = "unchecked"))
    )),
    ignore
)]
#[should_panic(expected = "precondition violated: feed is finished")]
fn test_advance_finished_range_panics() {
    let mut feed = adapt_range([1]);
    feed.advance();
    feed.advance();
}
