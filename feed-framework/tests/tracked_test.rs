use feed_framework::{adapt_range, Feed, Position, Stream, Tracked};

#[test]
fn test_tracked_position() {
    let mut feed = Tracked::new(adapt_range("ab\ncd".chars()));
    assert_eq!(feed.position(), Position::new());

    feed.advance(); // 'a'
    assert_eq!(feed.position(), Position::at(1, 2, 1));
    feed.advance(); // 'b'
    feed.advance(); // '\n'
    assert_eq!(feed.position(), Position::at(2, 1, 3));
    assert_eq!(feed.read(), &'c');
}

#[test]
fn test_tracked_rollback_restores_position() {
    let mut feed = Tracked::new(adapt_range("x\ny".chars()));
    feed.advance();
    let cp = feed.checkpoint();
    assert_eq!(cp.position(), Position::at(1, 2, 1));

    feed.advance();
    feed.advance();
    assert_eq!(feed.position(), Position::at(2, 2, 3));
    assert!(feed.is_finished());

    feed.rollback(&cp);
    assert_eq!(feed.position(), Position::at(1, 2, 1));
    assert_eq!(feed.next_item(), Some('\n'));
}

#[test]
fn test_tracked_stream_across_chunks() {
    let stream: Stream<u8> = Stream::new();
    let mut feed = Tracked::new(stream);
    feed.inner_mut().append(b"a\n".to_vec());
    while feed.next_item().is_some() {}
    assert!(feed.is_exhausted());
    assert!(!feed.is_finished());
    assert_eq!(feed.position(), Position::at(2, 1, 2));

    feed.inner_mut().append(b"bc".to_vec());
    feed.inner_mut().finish();
    while feed.next_item().is_some() {}
    assert!(feed.is_finished());
    assert_eq!(feed.position(), Position::at(2, 3, 4));
    assert_eq!(feed.position().offset, feed.inner().offset());
}

#[test]
fn test_tracked_resume_position() {
    let mut feed = Tracked::with_position(adapt_range("z".chars()), Position::at(10, 4, 99));
    feed.advance();
    assert_eq!(feed.position(), Position::at(10, 5, 100));
    let inner = feed.into_inner();
    assert!(inner.is_finished());
}
