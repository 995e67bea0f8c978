//! E2/E3/E4: write-back coalescing, threshold-triggered drain, and
//! read-after-write consistency through the cache.

use unistream::StreamOpts;

#[tokio::test]
async fn small_writes_coalesce_below_threshold() {
    let opts = StreamOpts {
        rcache_maxn: 64,
        wcache_maxn: 16,
    };
    let mut stream = unistream::init_from_url_with_opts("data://", opts).unwrap();
    stream.open().await.unwrap();

    stream.write(b"ab").await.unwrap();
    stream.write(b"cd").await.unwrap();
    // below the 16-byte threshold: nothing has reached the backend yet,
    // but a read-after forces the flush so the bytes are still visible.
    stream.sync(false).await.unwrap();

    stream.seek(0).await.unwrap();
    let mut buf = [0u8; 4];
    let n = stream.read(&mut buf).await.unwrap();
    assert_eq!(n, 4);
    assert_eq!(&buf, b"abcd");
}

#[tokio::test]
async fn write_drains_once_threshold_is_reached() {
    let opts = StreamOpts {
        rcache_maxn: 64,
        wcache_maxn: 4,
    };
    let mut stream = unistream::init_from_url_with_opts("data://", opts).unwrap();
    stream.open().await.unwrap();

    stream.write(b"abcd").await.unwrap();
    stream.write(b"efgh").await.unwrap();

    stream.seek(0).await.unwrap();
    let mut buf = [0u8; 8];
    let n = stream.read(&mut buf).await.unwrap();
    assert_eq!(n, 8);
    assert_eq!(&buf, b"abcdefgh");
}

#[tokio::test]
async fn read_after_flushes_dirty_write_cache_as_a_side_effect() {
    let opts = StreamOpts {
        rcache_maxn: 64,
        wcache_maxn: 64,
    };
    let mut stream = unistream::init_from_url_with_opts("data://", opts).unwrap();
    stream.open().await.unwrap();

    // Below the threshold, so `write` leaves these bytes sitting in the
    // write cache rather than sending them to the backend.
    stream.write(b"xyz").await.unwrap();

    // The stream is positioned past what it just wrote, so this read sees
    // EOF — but `read_after` must still have forced the pending bytes to
    // land on the backend before returning.
    let mut buf = [0u8; 3];
    let n = stream.read_after(&mut buf).await.unwrap();
    assert_eq!(n, 0);

    stream.seek(0).await.unwrap();
    let n = stream.read(&mut buf).await.unwrap();
    assert_eq!(n, 3);
    assert_eq!(&buf, b"xyz");
}

#[tokio::test]
async fn owrit_opens_implicitly_and_writes() {
    let mut stream = unistream::open("data://").unwrap();
    let n = stream.owrit(b"hi").await.unwrap();
    assert_eq!(n, 2);
}
