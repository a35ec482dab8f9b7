//! Playback transport built on rodio, with an observer registry for media
//! events.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ringbuf::{traits::*, HeapRb};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use super::metadata::{probe_track, TrackInfo};
use super::sample_capture::{SampleCapture, SampleTap};
use crate::error::{Result, VizError};

/// Mono samples kept for analysis (~372ms at 44.1kHz)
pub const TAP_CAPACITY: usize = 16384;

/// How often the transport thread reports playback position
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Notifications a media element sends to its observers.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Play,
    Pause,
    TimeUpdate(f64),
    DurationChange(f64),
    Ended,
    VolumeChange { volume: f32, muted: bool },
    Emptied,
    LoadedMetadata,
}

/// Receiving end of one observer registration.
pub struct MediaObserver {
    id: u64,
    rx: Receiver<MediaEvent>,
}

impl MediaObserver {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Events queued since the last drain, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = MediaEvent> + '_ {
        self.rx.try_iter()
    }
}

/// Commands sent to the playback thread.
enum TransportCommand {
    Load(PathBuf),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    Stop,
}

/// State shared between the element handle and its playback thread.
struct Shared {
    observers: Mutex<Vec<(u64, Sender<MediaEvent>)>>,
    next_observer: AtomicU64,
    source_claimed: AtomicBool,
    has_metadata: AtomicBool,
    playing: AtomicBool,
    /// f32 bits
    volume: AtomicU32,
    muted: AtomicBool,
    /// f64 bits, seconds
    position: AtomicU64,
    /// Bumped on every load so stale probe results are dropped
    generation: AtomicU64,
    track: Mutex<Option<TrackInfo>>,
}

impl Shared {
    fn emit(&self, event: MediaEvent) {
        if let Ok(mut observers) = self.observers.lock() {
            observers.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::SeqCst))
    }

    fn effective_volume(&self) -> f32 {
        if self.muted.load(Ordering::SeqCst) {
            0.0
        } else {
            self.volume()
        }
    }

    fn set_position(&self, secs: f64) {
        self.position.store(secs.to_bits(), Ordering::SeqCst);
    }
}

/// An audio element: loads one file at a time, plays it through the default
/// output device and writes a mono copy of what it plays into a sample tap.
pub struct MediaElement {
    id: u64,
    shared: Arc<Shared>,
    tap: SampleTap,
    cmd_tx: Sender<TransportCommand>,
}

impl MediaElement {
    /// Create an element that plays through the default output device.
    pub fn new() -> Self {
        Self::spawn(true)
    }

    /// Create an element that decodes and tracks state without opening an
    /// output device.
    pub fn headless() -> Self {
        Self::spawn(false)
    }

    fn spawn(with_output: bool) -> Self {
        let (tx, rx) = mpsc::channel::<TransportCommand>();
        let shared = Arc::new(Shared {
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(1),
            source_claimed: AtomicBool::new(false),
            has_metadata: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            volume: AtomicU32::new(1.0f32.to_bits()),
            muted: AtomicBool::new(false),
            position: AtomicU64::new(0f64.to_bits()),
            generation: AtomicU64::new(0),
            track: Mutex::new(None),
        });
        let tap: SampleTap = Arc::new(Mutex::new(HeapRb::<f32>::new(TAP_CAPACITY)));

        let thread_shared = shared.clone();
        let thread_tap = tap.clone();
        thread::spawn(move || {
            // the output stream is not Send, so it lives on this thread
            let output = if with_output {
                match OutputStream::try_default() {
                    Ok(output) => Some(output),
                    Err(e) => {
                        warn!("no audio output device: {}", e);
                        None
                    }
                }
            } else {
                None
            };
            let mut transport = Transport {
                shared: thread_shared,
                tap: thread_tap,
                handle: output.as_ref().map(|(_, handle)| handle.clone()),
                sink: None,
                path: None,
            };
            transport.run(rx);
            drop(output);
        });

        Self {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::SeqCst),
            shared,
            tap,
            cmd_tx: tx,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn sample_tap(&self) -> SampleTap {
        self.tap.clone()
    }

    /// Replace the current track with `path`. Emits `Emptied` now and
    /// `LoadedMetadata` once the file decodes.
    pub fn load(&self, path: &Path) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.has_metadata.store(false, Ordering::SeqCst);
        self.shared.playing.store(false, Ordering::SeqCst);
        self.shared.set_position(0.0);
        if let Ok(mut track) = self.shared.track.lock() {
            *track = None;
        }
        self.shared.emit(MediaEvent::Emptied);
        let _ = self.cmd_tx.send(TransportCommand::Load(path.to_path_buf()));
    }

    pub fn play(&self) {
        if !self.shared.playing.swap(true, Ordering::SeqCst) {
            self.shared.emit(MediaEvent::Play);
        }
        let _ = self.cmd_tx.send(TransportCommand::Play);
    }

    pub fn pause(&self) {
        if self.shared.playing.swap(false, Ordering::SeqCst) {
            self.shared.emit(MediaEvent::Pause);
        }
        let _ = self.cmd_tx.send(TransportCommand::Pause);
    }

    pub fn toggle(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to `secs`, clamped at zero.
    pub fn seek(&self, secs: f64) {
        if !secs.is_finite() {
            return;
        }
        let _ = self.cmd_tx.send(TransportCommand::Seek(secs.max(0.0)));
    }

    /// Seek relative to the last reported position.
    pub fn seek_by(&self, delta: f64) {
        self.seek(self.current_time() + delta);
    }

    pub fn set_volume(&self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.shared.volume.store(volume.to_bits(), Ordering::SeqCst);
        self.emit_volume();
    }

    pub fn set_muted(&self, muted: bool) {
        self.shared.muted.store(muted, Ordering::SeqCst);
        self.emit_volume();
    }

    fn emit_volume(&self) {
        self.shared.emit(MediaEvent::VolumeChange {
            volume: self.volume(),
            muted: self.is_muted(),
        });
        let _ = self
            .cmd_tx
            .send(TransportCommand::SetVolume(self.shared.effective_volume()));
    }

    /// Drop the current track and silence output.
    pub fn stop(&self) {
        self.shared.playing.store(false, Ordering::SeqCst);
        let _ = self.cmd_tx.send(TransportCommand::Stop);
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }

    pub fn has_metadata(&self) -> bool {
        self.shared.has_metadata.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> f32 {
        self.shared.volume()
    }

    pub fn is_muted(&self) -> bool {
        self.shared.muted.load(Ordering::SeqCst)
    }

    pub fn current_time(&self) -> f64 {
        f64::from_bits(self.shared.position.load(Ordering::SeqCst))
    }

    pub fn track_info(&self) -> Option<TrackInfo> {
        self.shared.track.lock().ok().and_then(|t| t.clone())
    }

    /// Register an observer; events are queued until drained.
    pub fn subscribe(&self) -> MediaObserver {
        let (tx, rx) = mpsc::channel();
        let id = self.shared.next_observer.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut observers) = self.shared.observers.lock() {
            observers.push((id, tx));
        }
        MediaObserver { id, rx }
    }

    pub fn unsubscribe(&self, observer_id: u64) {
        if let Ok(mut observers) = self.shared.observers.lock() {
            observers.retain(|(id, _)| *id != observer_id);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.lock().map(|o| o.len()).unwrap_or(0)
    }

    /// Claim the element's single source slot.
    pub fn claim_source(&self) -> Result<()> {
        self.shared
            .source_claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| VizError::GraphAlreadyConnected)
    }

    pub fn release_source(&self) {
        self.shared.source_claimed.store(false, Ordering::SeqCst);
    }

    pub fn is_source_claimed(&self) -> bool {
        self.shared.source_claimed.load(Ordering::SeqCst)
    }

    /// Mark metadata as available and notify observers, as a decoded load
    /// would.
    #[cfg(test)]
    pub(crate) fn mark_loaded(&self, duration: f64) {
        self.shared.has_metadata.store(true, Ordering::SeqCst);
        self.shared.emit(MediaEvent::LoadedMetadata);
        self.shared.emit(MediaEvent::DurationChange(duration));
    }

    #[cfg(test)]
    pub(crate) fn emit(&self, event: MediaEvent) {
        self.shared.emit(event);
    }
}

impl Default for MediaElement {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback thread state.
struct Transport {
    shared: Arc<Shared>,
    tap: SampleTap,
    handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    path: Option<PathBuf>,
}

impl Transport {
    fn run(&mut self, rx: Receiver<TransportCommand>) {
        loop {
            match rx.recv_timeout(TIME_UPDATE_INTERVAL) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.report_progress();
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn handle_command(&mut self, cmd: TransportCommand) {
        match cmd {
            TransportCommand::Load(path) => {
                self.load(&path);
                self.path = Some(path);
            }
            TransportCommand::Play => {
                if self.sink.is_none() {
                    // ended or stopped, start the track over
                    if let Some(path) = self.path.clone() {
                        self.load(&path);
                    }
                }
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            TransportCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
                self.clear_tap();
            }
            TransportCommand::Seek(secs) => {
                if let Some(sink) = &self.sink {
                    match sink.try_seek(Duration::from_secs_f64(secs)) {
                        Ok(()) => {
                            self.shared.set_position(secs);
                            self.shared.emit(MediaEvent::TimeUpdate(secs));
                        }
                        Err(e) => debug!("seek to {:.1}s failed: {}", secs, e),
                    }
                }
            }
            TransportCommand::SetVolume(volume) => {
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
            TransportCommand::Stop => {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.shared.set_position(0.0);
            }
        }
    }

    /// Drop captured samples so a stopped element reads as silence.
    fn clear_tap(&self) {
        if let Ok(mut buf) = self.tap.lock() {
            buf.clear();
        }
    }

    fn load(&mut self, path: &Path) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.clear_tap();

        let source = match File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|f| Decoder::new(BufReader::new(f)).map_err(|e| e.to_string()))
        {
            Ok(source) => source,
            Err(e) => {
                warn!("failed to decode {}: {}", path.display(), e);
                return;
            }
        };
        let duration = source.total_duration();

        if let Some(handle) = &self.handle {
            match Sink::try_new(handle) {
                Ok(sink) => {
                    sink.pause();
                    sink.set_volume(self.shared.effective_volume());
                    sink.append(SampleCapture::new(
                        source.convert_samples::<f32>(),
                        self.tap.clone(),
                    ));
                    if self.shared.playing.load(Ordering::SeqCst) {
                        sink.play();
                    }
                    self.sink = Some(sink);
                }
                Err(e) => warn!("failed to open sink: {}", e),
            }
        }

        info!("loaded {}", path.display());
        self.shared.has_metadata.store(true, Ordering::SeqCst);
        self.shared.emit(MediaEvent::LoadedMetadata);
        if let Some(d) = duration {
            self.shared.emit(MediaEvent::DurationChange(d.as_secs_f64()));
        }
        self.spawn_probe(path.to_path_buf());
    }

    /// Read tags off the playback thread; results from a superseded load
    /// are dropped.
    fn spawn_probe(&self, path: PathBuf) {
        let shared = self.shared.clone();
        let generation = shared.generation.load(Ordering::SeqCst);
        thread::spawn(move || match probe_track(&path) {
            Ok(info) => {
                if shared.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                let duration = info.duration_secs;
                if let Ok(mut track) = shared.track.lock() {
                    *track = Some(info);
                }
                if duration > 0.0 {
                    shared.emit(MediaEvent::DurationChange(duration));
                }
            }
            Err(e) => debug!("no tags for {}: {}", path.display(), e),
        });
    }

    fn report_progress(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if !self.shared.playing.load(Ordering::SeqCst) {
            return;
        }

        let ended = sink.empty();
        let secs = sink.get_pos().as_secs_f64();
        if ended {
            self.sink = None;
            self.clear_tap();
            self.shared.playing.store(false, Ordering::SeqCst);
            self.shared.emit(MediaEvent::Ended);
            return;
        }

        self.shared.set_position(secs);
        self.shared.emit(MediaEvent::TimeUpdate(secs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_claim_is_exclusive() {
        let media = MediaElement::headless();
        media.claim_source().unwrap();
        assert!(matches!(
            media.claim_source(),
            Err(VizError::GraphAlreadyConnected)
        ));
        media.release_source();
        assert!(media.claim_source().is_ok());
    }

    #[test]
    fn test_play_pause_emit_once() {
        let media = MediaElement::headless();
        let observer = media.subscribe();
        media.play();
        media.play();
        media.pause();

        let events: Vec<_> = observer.drain().collect();
        assert_eq!(events, vec![MediaEvent::Play, MediaEvent::Pause]);
    }

    #[test]
    fn test_pause_drops_captured_samples() {
        let media = MediaElement::headless();
        {
            let tap = media.sample_tap();
            let mut buf = tap.lock().unwrap();
            for _ in 0..512 {
                crate::audio::sample_capture::push_sample(&mut buf, 0.5);
            }
        }
        media.play();
        media.pause();

        let tap = media.sample_tap();
        let cleared = (0..100).any(|_| {
            thread::sleep(Duration::from_millis(10));
            tap.lock().unwrap().is_empty()
        });
        assert!(cleared);
    }

    #[test]
    fn test_volume_is_clamped_and_reported() {
        let media = MediaElement::headless();
        let observer = media.subscribe();
        media.set_volume(1.7);
        media.set_muted(true);

        let events: Vec<_> = observer.drain().collect();
        assert_eq!(
            events,
            vec![
                MediaEvent::VolumeChange { volume: 1.0, muted: false },
                MediaEvent::VolumeChange { volume: 1.0, muted: true },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let media = MediaElement::headless();
        let observer = media.subscribe();
        assert_eq!(media.observer_count(), 1);
        media.unsubscribe(observer.id());
        assert_eq!(media.observer_count(), 0);
        media.play();
        assert_eq!(observer.drain().count(), 0);
    }

    #[test]
    fn test_load_resets_metadata() {
        let media = MediaElement::headless();
        media.mark_loaded(10.0);
        assert!(media.has_metadata());

        let observer = media.subscribe();
        media.load(Path::new("/nonexistent/track.mp3"));
        assert!(!media.has_metadata());
        assert_eq!(observer.drain().next(), Some(MediaEvent::Emptied));
    }

    #[test]
    fn test_element_ids_are_unique() {
        let a = MediaElement::headless();
        let b = MediaElement::headless();
        assert_ne!(a.id(), b.id());
    }
}
