// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jack_adapters::FakeJenkins;

#[tokio::test]
async fn chunks_are_forwarded_in_order() {
    let jenkins = FakeJenkins::new();
    jenkins.set_log(vec![
        Ok("[Pipeline] Start\n".to_string()),
        Ok("hello\n".to_string()),
        Ok("Finished: SUCCESS\n".to_string()),
    ]);
    let mut sink = Vec::new();

    let summary = relay(&jenkins, &BuildHandle::new("demo", 3), &mut sink).await.unwrap();

    assert_eq!(String::from_utf8(sink).unwrap(), "[Pipeline] Start\nhello\nFinished: SUCCESS\n");
    assert_eq!(summary, RelaySummary { chunks: 3, bytes: 41 });
}

#[tokio::test]
async fn empty_log_relays_nothing() {
    let jenkins = FakeJenkins::new();
    let mut sink = Vec::new();

    let summary = relay(&jenkins, &BuildHandle::new("demo", 1), &mut sink).await.unwrap();

    assert!(sink.is_empty());
    assert_eq!(summary, RelaySummary::default());
}

#[tokio::test]
async fn transport_failure_is_terminal() {
    let jenkins = FakeJenkins::new();
    jenkins.set_log(vec![
        Ok("partial\n".to_string()),
        Err(JenkinsError::Transport { url: "u".to_string(), message: "reset".to_string() }),
        Ok("never\n".to_string()),
    ]);
    let mut sink = Vec::new();

    let err = relay(&jenkins, &BuildHandle::new("demo", 1), &mut sink).await.unwrap_err();

    assert!(matches!(err, RelayError::Jenkins(JenkinsError::Transport { .. })));
    assert_eq!(String::from_utf8(sink).unwrap(), "partial\n");
}

struct BrokenSink;

impl LogSink for BrokenSink {
    fn write_chunk(&mut self, _chunk: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }
}

#[tokio::test]
async fn sink_failure_ends_the_relay() {
    let jenkins = FakeJenkins::new();
    jenkins.set_log(vec![Ok("one\n".to_string())]);

    let err = relay(&jenkins, &BuildHandle::new("demo", 1), &mut BrokenSink).await.unwrap_err();

    assert!(matches!(err, RelayError::Sink(_)));
}
