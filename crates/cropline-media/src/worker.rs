// crates/cropline-media/src/worker.rs
//
// MediaWorker: background probe threads plus a dedicated preview-decode
// thread fed by a latest-wins request slot. All public API that cropline-ui
// calls lives here.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex,
};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use cropline_core::media_types::MediaResult;

use crate::decode::decode_rgba_frame;
use crate::probe::probe_metadata;

struct FrameRequest {
    id:        Uuid,
    path:      PathBuf,
    timestamp: f64,
}

pub struct MediaWorker {
    /// Probe results and decoded preview frames, drained by the UI each frame.
    pub rx: Receiver<MediaResult>,
    tx:     Sender<MediaResult>,

    /// Latest-wins slot for preview frames. Scrubbing and playback overwrite
    /// any pending request; the decode thread always picks up the freshest
    /// one, so a slow decode never builds a queue of stale positions.
    frame_req: Arc<(Mutex<Option<FrameRequest>>, Condvar)>,
    shutdown:  Arc<AtomicBool>,
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx) = bounded(64);

        let frame_req: Arc<(Mutex<Option<FrameRequest>>, Condvar)> =
            Arc::new((Mutex::new(None), Condvar::new()));

        // ── Preview decode thread ─────────────────────────────────────────────
        // Blocks on the slot; one decode per wake. Decode failures are logged
        // and skipped — the canvas simply keeps the previous frame.
        let result_tx = tx.clone();
        let slot      = Arc::clone(&frame_req);
        thread::spawn(move || loop {
            let req = {
                let (lock, cvar) = &*slot;
                let mut guard = lock.lock().unwrap();
                while guard.is_none() {
                    guard = cvar.wait(guard).unwrap();
                }
                guard.take().unwrap()
            };

            // Poison-pill: a request with a nil id signals shutdown.
            if req.id == Uuid::nil() {
                return;
            }

            match decode_rgba_frame(&req.path, req.timestamp) {
                Ok(f) => {
                    let _ = result_tx.send(MediaResult::Frame {
                        id:     req.id,
                        width:  f.width,
                        height: f.height,
                        data:   f.data,
                    });
                }
                Err(e) => eprintln!("[media] frame decode: {e}"),
            }
        });

        Self {
            rx,
            tx,
            frame_req,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Wake the decode thread with a poison-pill so it exits cleanly
        // instead of blocking forever on the condvar.
        let (lock, cvar) = &*self.frame_req;
        *lock.lock().unwrap() = Some(FrameRequest {
            id:        Uuid::nil(),
            path:      PathBuf::new(),
            timestamp: 0.0,
        });
        cvar.notify_one();
    }

    /// Probe a newly selected file: metadata first (enables the overlay and
    /// submission), then a poster frame a little way into the video.
    pub fn probe_video(&self, id: Uuid, path: PathBuf) {
        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                return;
            }
            match probe_metadata(&path) {
                Ok((width, height, duration)) => {
                    eprintln!(
                        "[media] video size {width}x{height}, {duration:.2}s ← {}",
                        path.display()
                    );
                    let _ = tx.send(MediaResult::Metadata { id, width, height, duration });

                    // Poster ~10% in; very short files just take the first frame.
                    let ts = if duration > 2.0 { (duration * 0.1).max(1.0) } else { 0.0 };
                    if sd.load(Ordering::Relaxed) {
                        return;
                    }
                    match decode_rgba_frame(&path, ts) {
                        Ok(f) => {
                            let _ = tx.send(MediaResult::Frame {
                                id,
                                width:  f.width,
                                height: f.height,
                                data:   f.data,
                            });
                        }
                        Err(e) => eprintln!("[media] poster decode: {e}"),
                    }
                }
                Err(e) => {
                    eprintln!("[media] probe failed: {e}");
                    let _ = tx.send(MediaResult::Error { id, msg: e.to_string() });
                }
            }
        });
    }

    /// Request a preview frame at `timestamp`. Overwrites any pending request.
    pub fn request_frame(&self, id: Uuid, path: PathBuf, timestamp: f64) {
        let (lock, cvar) = &*self.frame_req;
        *lock.lock().unwrap() = Some(FrameRequest { id, path, timestamp });
        cvar.notify_one();
    }
}

impl Default for MediaWorker {
    fn default() -> Self {
        Self::new()
    }
}
