use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use futures::task::noop_waker_ref;
use tiny_skia::Pixmap;

use crate::codec;
use crate::error::PadResult;

/// A saved signature waiting to be decoded.
///
/// The decode only runs when the owner polls it, so the drawing is replaced
/// at a point the host controls.
pub struct PendingLoad {
    data_url: String,
    task: LocalBoxFuture<'static, PadResult<Pixmap>>,
}

impl std::fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLoad")
            .field("data_url_len", &self.data_url.len())
            .finish_non_exhaustive()
    }
}

impl PendingLoad {
    pub fn new(data_url: String) -> Self {
        let source = data_url.clone();
        let task = async move {
            let parsed = codec::decode_data_url(&source)?;
            codec::decode_image(&parsed.bytes)
        }
        .boxed_local();
        Self { data_url, task }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Polls the decode once without registering for wake-ups.
    pub fn poll_once(&mut self) -> Poll<PadResult<Pixmap>> {
        let mut cx = Context::from_waker(noop_waker_ref());
        self.task.poll_unpin(&mut cx)
    }

    /// Drives the decode to completion.
    pub async fn finish(self) -> (String, PadResult<Pixmap>) {
        let result = self.task.await;
        (self.data_url, result)
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }
}
