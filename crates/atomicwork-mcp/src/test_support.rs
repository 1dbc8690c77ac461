//! Shared fixtures for unit tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atomicwork_core::{ApiRequest, Config, TicketApi};
use serde_json::Value;

mockall::mock! {
    pub Api {}

    #[async_trait]
    impl TicketApi for Api {
        async fn send(&self, request: ApiRequest) -> atomicwork_core::Result<Value>;
    }
}

/// Config with every field set, pointing at a fictional tenant.
pub fn test_config() -> Config {
    Config {
        api_key: Some("aw_test_key".to_string()),
        base_url: "https://acme.atomicwork.com/api/v1".to_string(),
        user_id: "42".to_string(),
        workspace_id: "9".to_string(),
    }
}

/// Writer that keeps everything written for later inspection.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
