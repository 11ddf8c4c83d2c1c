#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use retouch_core::codec::ImageCodec;
use retouch_core::crop::extract_region;
use retouch_core::gateway::{TransformGateway, TransformOutcome};
use retouch_core::types::{ImageResource, TransformRequest};
use tokio::sync::Notify;

/// Encode a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([shade, shade, shade, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// A loaded PNG resource.
pub fn image(width: u32, height: u32, shade: u8) -> ImageResource {
    ImageCodec::load(png_bytes(width, height, shade), "image/png").expect("load test image")
}

/// Gateway that replays queued outcomes for generator-backed requests and
/// performs crops locally, recording every request it receives.
///
/// When `gated`, each generator call waits for [`release`](Self::release)
/// after signalling `started`.
pub struct ScriptedGateway {
    outcomes: Mutex<VecDeque<TransformOutcome>>,
    requests: Mutex<Vec<TransformRequest>>,
    calls: AtomicUsize,
    gated: bool,
    started: Notify,
    release: Notify,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::build(false)
    }

    pub fn gated() -> Self {
        Self::build(true)
    }

    fn build(gated: bool) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gated,
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn push(&self, outcome: TransformOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransformRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait until a gated call has entered the gateway.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one gated call proceed.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl TransformGateway for ScriptedGateway {
    async fn invoke(&self, base: ImageResource, request: TransformRequest) -> TransformOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if self.gated {
            self.started.notify_one();
            self.release.notified().await;
        }

        match request {
            TransformRequest::Crop { rect } => extract_region(&base, &rect),
            _ => self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted outcome left"),
        }
    }
}
