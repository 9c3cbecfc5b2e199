//! Control channel to the KVM host. The channel is a single already-connected
//! TCP stream; sends are fire-and-forget. When the channel is down every send
//! is a silent no-op: stale input is dropped, never queued. Reconnect and
//! heartbeat belong to the surrounding application, not here.

use std::io::Write;
use std::net::TcpStream;

use super::{wire, HidEvent, HidSink};

#[derive(Debug)]
pub enum ChannelError {
    ConnectFailed(String),
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::ConnectFailed(msg) => write!(f, "connect failed: {}", msg),
        }
    }
}

impl std::error::Error for ChannelError {}

pub struct ControlChannel {
    stream: Option<TcpStream>,
}

impl ControlChannel {
    pub fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| ChannelError::ConnectFailed(format!("{}: {}", addr, e)))?;
        // Input frames are tiny and latency-sensitive.
        let _ = stream.set_nodelay(true);
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// A channel that was never connected. Every send is a no-op; the UI
    /// still runs (offline mode).
    pub fn disconnected() -> Self {
        Self { stream: None }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Fire-and-forget. A write error drops the stream; subsequent sends
    /// become no-ops until the application reconnects.
    pub fn send(&mut self, frame: &[u8]) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        if let Err(e) = stream.write_all(frame) {
            log::warn!("control channel write failed, dropping connection: {}", e);
            self.stream = None;
        }
    }
}

/// The production sink: encodes each logical event and hands the frame to
/// the channel.
pub struct WireSink {
    pub channel: ControlChannel,
}

impl WireSink {
    pub fn new(channel: ControlChannel) -> Self {
        Self { channel }
    }
}

impl HidSink for WireSink {
    fn send(&mut self, event: HidEvent) {
        let frame = wire::encode(&event);
        log::trace!("send {:?} ({} bytes)", event, frame.len());
        self.channel.send(&frame);
    }
}
