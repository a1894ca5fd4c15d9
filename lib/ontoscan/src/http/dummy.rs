//! Stand-in used when remote sources are not compiled in.

use std::io::{Empty, Error, ErrorKind, Result};
use std::time::Duration;

pub struct Client;

impl Client {
    #[expect(clippy::unnecessary_wraps)]
    pub fn new(_timeout: Option<Duration>, _redirection_limit: usize) -> Result<Self> {
        Ok(Self)
    }

    #[expect(clippy::unused_self)]
    pub fn get(&self, url: &str, _accept: &'static str) -> Result<(String, Empty)> {
        Err(Error::new(
            ErrorKind::Unsupported,
            format!(
                "Not able to fetch {url}: HTTP client is not available. Enable the feature 'http-client'"
            ),
        ))
    }
}
