//! Common test utilities and fixtures
//!
//! Shared by the integration tests of hub-json.

#![allow(dead_code)]

use hub_json::{JsonEngine, JsonSettings, JsonWritable, Result, SerdeJsonEngine};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber; `RUST_LOG` overrides the filter
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hub_json=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Engine that counts how often it is asked to do work
#[derive(Debug, Default)]
pub struct SpyEngine {
    inner: SerdeJsonEngine,
    serialize_calls: AtomicUsize,
    deserialize_calls: AtomicUsize,
}

impl SpyEngine {
    pub fn serialize_calls(&self) -> usize {
        self.serialize_calls.load(Ordering::SeqCst)
    }

    pub fn deserialize_calls(&self) -> usize {
        self.deserialize_calls.load(Ordering::SeqCst)
    }
}

impl JsonEngine for SpyEngine {
    type Settings = JsonSettings;

    fn from_settings(settings: JsonSettings) -> Self {
        Self {
            inner: SerdeJsonEngine::from_settings(settings),
            serialize_calls: AtomicUsize::new(0),
            deserialize_calls: AtomicUsize::new(0),
        }
    }

    fn settings(&self) -> &JsonSettings {
        self.inner.settings()
    }

    fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T> {
        self.deserialize_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.deserialize(json)
    }

    fn serialize(&self, value: &dyn erased_serde::Serialize, writer: &mut dyn Write) -> Result<()> {
        self.serialize_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.serialize(value, writer)
    }
}

/// Hub message that writes a fixed document regardless of its fields
#[derive(Debug, Serialize)]
pub struct CustomMessage {
    pub hub: String,
    pub sequence: u64,
}

impl JsonWritable for CustomMessage {
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(br#"{"custom":true}"#)
    }
}

/// Typical hub invocation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubResponse {
    pub request_id: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub state: Vec<(String, String)>,
}

impl HubResponse {
    pub fn ok(request_id: &str, result: serde_json::Value) -> Self {
        Self {
            request_id: request_id.to_string(),
            result: Some(result),
            error: None,
            state: Vec::new(),
        }
    }
}

/// Sink that refuses every write
pub struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source that fails on the first read
pub struct ResetSource;

impl Read for ResetSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
    }
}

/// Source whose transport reports corrupted data
pub struct CorruptSource;

impl Read for CorruptSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "tls record corrupted"))
    }
}
