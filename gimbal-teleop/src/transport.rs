use anyhow::Result;
use mockall::automock;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Synchronous request/response access to the device.
///
/// Implementations return `Err` only for transport failures; any HTTP status
/// is reported through [`HttpReply`].
#[automock]
pub trait DeviceTransport {
    fn get(&self, url: &str) -> Result<HttpReply>;
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply>;
}
