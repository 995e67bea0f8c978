//! E5: a `StreamHandle::kill()` issued from another task is observed by
//! the next operator on the stream it was cloned from.

#[tokio::test]
async fn kill_before_open_fails_open() {
    let mut stream = unistream::open("data://AABB").unwrap();
    let handle = stream.handle();
    handle.kill();

    let result = stream.open().await;
    assert!(matches!(result, Err(unistream::StreamError::Killed)));
}

#[tokio::test]
async fn kill_after_open_fails_subsequent_read() {
    let mut stream = unistream::open("data://AABB").unwrap();
    stream.open().await.unwrap();

    let handle = stream.handle();
    handle.kill();

    let mut buf = [0u8; 2];
    let result = stream.read(&mut buf).await;
    assert!(matches!(result, Err(unistream::StreamError::Killed)));
}

#[tokio::test]
async fn kill_is_idempotent() {
    let stream = unistream::open("data://AABB").unwrap();
    let handle = stream.handle();
    handle.kill();
    handle.kill();
    assert!(handle.is_stopped());
}

#[tokio::test]
async fn task_wakes_early_on_kill_instead_of_waiting_out_the_delay() {
    use std::time::Duration;

    let mut stream = unistream::open("data://AABB").unwrap();
    stream.open().await.unwrap();
    let handle = stream.handle();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.kill();
    });

    let started = tokio::time::Instant::now();
    let result = stream.task(Duration::from_secs(3600)).await;
    assert!(matches!(result, Err(unistream::StreamError::Killed)));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn kill_from_spawned_task_is_visible() {
    let mut stream = unistream::open("data://AABB").unwrap();
    stream.open().await.unwrap();
    let handle = stream.handle();

    tokio::spawn(async move {
        handle.kill();
    })
    .await
    .unwrap();

    let mut buf = [0u8; 2];
    let result = stream.read(&mut buf).await;
    assert!(matches!(result, Err(unistream::StreamError::Killed)));
}
