//! The editor: one track, one viewport, one marker collection
//!
//! Owns every component and is the only thing the presentation layer talks
//! to. A frame runs in a fixed order:
//!
//! 1. [`Editor::handle_pointer_event`] / [`Editor::handle_key_event`] /
//!    [`Editor::submit_rename`] for each queued input
//! 2. [`Editor::end_frame`]: compact dead markers, then follow the transport
//! 3. render from the query methods ([`Editor::visible_peak_slice`],
//!    [`Editor::sorted_markers_for_display`], [`Editor::playhead_position_px`], ...)
//!
//! Nothing here blocks except [`Transport::wait_until_ready`] at play start.

use std::time::Duration;

use crate::config::{EditorConfig, EditorKeybindings, KeyAction};
use crate::decode::DecodedTrack;
use crate::error::{EditorError, EditorResult, TransportResult};
use crate::interaction::{
    cursor_for, transition, Cursor, HitTarget, MarkerInteraction, Mode, PointerEvent, PointerKind,
};
use crate::markers::{Marker, MarkerId, MarkerStore};
use crate::peaks::{reduce_peaks, PeakCache, PeakPair};
use crate::playhead::PlayheadTracker;
use crate::renamer::Renamer;
use crate::ruler::{ruler_ticks, RulerTick};
use crate::samples::SampleStore;
use crate::transport::Transport;
use crate::types::TrackInfo;
use crate::viewport::Viewport;

pub struct Editor<T: Transport> {
    track: TrackInfo,
    samples: SampleStore,
    peaks: PeakCache,
    viewport: Viewport,
    markers: MarkerStore,
    playhead: PlayheadTracker,
    renamer: Renamer,
    transport: T,
    keybindings: EditorKeybindings,
    mode: Mode,
    cursor: Cursor,
    /// Marker following the pointer while in `MarkerDrag`
    dragging: Option<MarkerId>,
    height_px: u32,
    nudge_multiplier: i64,
    min_tick_spacing_px: f32,
}

impl<T: Transport> Editor<T> {
    /// Validate the decoded stream and build every component
    pub fn new(decoded: &DecodedTrack, mut transport: T, config: &EditorConfig) -> EditorResult<Self> {
        if decoded.sample_rate == 0 {
            return Err(EditorError::ZeroSampleRate);
        }
        let samples = SampleStore::from_pcm16(&decoded.pcm, decoded.channels)?;
        if samples.is_empty() {
            return Err(EditorError::EmptyTrack);
        }
        let track = TrackInfo::new(decoded.sample_rate, decoded.channels, decoded.pcm.len());

        transport.set_volume(config.volume.clamp(0.0, 1.0));
        log::info!(
            "Editor: {:.2}s, {} Hz, {} ch, {} mono samples",
            track.seconds,
            track.sample_rate,
            track.channels,
            track.pcm_mono_len
        );

        Ok(Self {
            track,
            samples,
            peaks: PeakCache::new(),
            viewport: Viewport::new(track, config.zoom_rate, config.pan_rate, config.max_levels),
            markers: MarkerStore::new(track.pcm_len, config.marker_limit),
            playhead: PlayheadTracker::new(
                track.pcm_len,
                config.playhead_refresh(),
                config.playhead_min_refresh(),
            ),
            renamer: Renamer::new(config.marker_name_max_len),
            transport,
            keybindings: config.keybindings.clone(),
            mode: Mode::Idle,
            cursor: Cursor::Default,
            dragging: None,
            height_px: 0,
            nudge_multiplier: config.nudge_multiplier,
            min_tick_spacing_px: config.min_tick_spacing_px,
        })
    }

    // =========================================================================
    // Layout and peaks
    // =========================================================================

    /// Apply the wave area's size; a width change invalidates the peak cache
    pub fn resize(&mut self, width_px: u32, height_px: u32) {
        self.height_px = height_px;
        if self.viewport.resize(width_px) {
            self.peaks.invalidate();
            self.playhead.scale_refresh_interval(self.viewport.zoom_factor());
        }
    }

    /// Build the peak cache unless it is current. Returns true if a pass ran.
    pub fn rebuild_peaks_if_needed(&mut self) -> bool {
        if self.peaks.is_populated() || self.viewport.width_px() == 0 {
            return false;
        }
        self.peaks.build(&self.samples, self.viewport.bounds());
        true
    }

    /// Cached peak pairs covering the visible window
    pub fn visible_peak_slice(&mut self) -> &[PeakPair] {
        let window = self.viewport.visible_window(&self.peaks);
        if !window.changed && self.peaks.current_origin().is_some() {
            return self.peaks.current_slice();
        }
        match window.level {
            Some(level) if self.peaks.is_populated() => {
                self.peaks
                    .select(level, window.left_b / level, window.right_b / level)
            }
            _ => &[],
        }
    }

    /// One envelope per pixel column of the wave area
    pub fn pixel_envelopes(&mut self) -> Vec<PeakPair> {
        let slice_len = self.visible_peak_slice().len();
        let Some((level, start)) = self.peaks.current_origin() else {
            return Vec::new();
        };
        let slice = self.peaks.current_slice();
        let width = self.viewport.width_px() as usize;

        (0..width)
            .map(|px| {
                let first = self.viewport.px_to_samples(px as f32) / level;
                let last = self.viewport.px_to_samples(px as f32 + 1.0) / level;
                let from = first.saturating_sub(start).min(slice_len);
                let to = last.saturating_sub(start).max(from + 1).min(slice_len);
                reduce_peaks(&slice[from..to])
            })
            .collect()
    }

    pub fn ruler_ticks(&self) -> Vec<RulerTick> {
        let left_b = self.viewport.left_b();
        let right_b = left_b + self.viewport.visible_samples();
        ruler_ticks(
            &self.track,
            left_b,
            right_b,
            self.viewport.samples_per_px(),
            self.min_tick_spacing_px,
        )
    }

    // =========================================================================
    // Presentation queries
    // =========================================================================

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    pub fn current_cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn track(&self) -> &TrackInfo {
        &self.track
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn peaks(&self) -> &PeakCache {
        &self.peaks
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Markers latest-first, dead ones included until the frame ends
    pub fn sorted_markers_for_display(&mut self) -> &[Marker] {
        self.markers.sorted_by_time_descending()
    }

    /// Live markers earliest-first, for the markers table
    pub fn markers_ascending(&self) -> Vec<&Marker> {
        self.markers.ascending()
    }

    pub fn marker_position_px(&self, id: MarkerId) -> Option<f32> {
        self.markers
            .get(id)
            .map(|m| self.viewport.samples_to_px(self.track.pcm_to_samples(m.timestamp_pcm)))
    }

    /// Playhead x; outside `[0, width)` when scrolled off-screen
    pub fn playhead_position_px(&self) -> f32 {
        let sample = self.track.pcm_to_samples(self.playhead.current_bytes());
        self.viewport.samples_to_px(sample)
    }

    pub fn playhead_bytes(&self) -> i64 {
        self.playhead.current_bytes()
    }

    pub fn playhead_seconds(&self) -> f64 {
        self.track
            .samples_to_seconds(self.track.pcm_to_samples(self.playhead.current_bytes()))
    }

    /// Redraw cadence while playing
    pub fn refresh_interval(&self) -> Duration {
        self.playhead.refresh_interval()
    }

    pub fn is_create_button_visible(&self) -> bool {
        self.mode.is_marker_adjacent()
    }

    pub fn is_editing(&self) -> bool {
        self.markers.is_editing()
    }

    pub fn renamer(&self) -> &Renamer {
        &self.renamer
    }

    /// Rename input; the presentation layer types into it
    pub fn renamer_mut(&mut self) -> &mut Renamer {
        &mut self.renamer
    }

    /// Which of a marker's parts are interactive this frame
    pub fn marker_interaction(&self, id: MarkerId) -> MarkerInteraction {
        let hovering = self.markers.hovering();
        let hovered = hovering == Some(id);
        let dragging = self.mode == Mode::MarkerDrag;
        let editing = self.mode == Mode::MarkerEdit;
        MarkerInteraction {
            flag: self.mode.is_marker_adjacent() && !editing,
            pole: (hovering.is_none() || hovered) && !dragging && !editing,
            label: !dragging,
            hovered,
        }
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Single entry point for classified pointer events
    pub fn handle_pointer_event(&mut self, event: PointerEvent, target: HitTarget) {
        self.release_orphaned_edit();
        let previous = self.mode;
        self.mode = transition(previous, event.kind, target);

        match previous {
            Mode::MarkerDrag => self.handle_drag(&event),
            Mode::MarkerEdit => self.handle_edit_lock(&event, target),
            _ => self.handle_region(&event, target),
        }

        self.cursor = cursor_for(self.mode);
        if previous != self.mode {
            log::debug!("Editor: {:?} -> {:?} ({:?} on {:?})", previous, self.mode, event.kind, target);
        }
    }

    fn handle_region(&mut self, event: &PointerEvent, target: HitTarget) {
        match target {
            HitTarget::Wave => {
                self.markers.stop_hover();
                self.handle_wave(event);
            }
            HitTarget::MarkerCreateAffordance => {
                self.markers.stop_hover();
                if event.kind == PointerKind::Press {
                    self.create_marker();
                }
            }
            HitTarget::MarkerFlag(id) => {
                self.markers.start_hover(id);
                if event.kind == PointerKind::Press {
                    self.markers.soft_delete(id);
                    self.markers.stop_hover();
                }
            }
            HitTarget::MarkerPole(id) => {
                self.markers.start_hover(id);
                match event.kind {
                    PointerKind::Release => self.seek_to_marker(id),
                    PointerKind::Drag => {
                        self.dragging = Some(id);
                        self.drag_marker_to(id, event.x);
                    }
                    _ => {}
                }
            }
            HitTarget::MarkerLabel(id) => {
                self.markers.stop_hover();
                if event.kind == PointerKind::Press {
                    self.begin_edit(id);
                }
            }
            HitTarget::None | HitTarget::MarkerLifeArea | HitTarget::Backdrop => {
                self.markers.stop_hover();
            }
        }
    }

    fn handle_wave(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerKind::Press => self.seek_to_px(event.x),
            PointerKind::Scroll => {
                self.viewport.zoom(event.scroll_dy, event.x);
                self.playhead.scale_refresh_interval(self.viewport.zoom_factor());
                self.viewport.pan(event.scroll_dx);
            }
            _ => {}
        }
    }

    fn handle_drag(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerKind::Drag => {
                if let Some(id) = self.dragging {
                    self.drag_marker_to(id, event.x);
                }
            }
            PointerKind::Release => self.dragging = None,
            _ => {}
        }
    }

    fn handle_edit_lock(&mut self, event: &PointerEvent, target: HitTarget) {
        if event.kind == PointerKind::Press && target == HitTarget::Backdrop {
            self.cancel_edit();
        }
    }

    fn drag_marker_to(&mut self, id: MarkerId, x: f32) {
        let sample = self.viewport.px_to_samples(x);
        self.markers.set_timestamp(id, self.track.samples_to_pcm(sample));
    }

    // =========================================================================
    // Markers
    // =========================================================================

    fn create_marker(&mut self) {
        match self.markers.create(self.playhead.current_bytes()) {
            Some(id) => {
                self.markers.start_edit(id);
                self.renamer.clear();
                self.mode = Mode::MarkerEdit;
            }
            None => self.mode = Mode::MarkerCreateIntent,
        }
    }

    fn begin_edit(&mut self, id: MarkerId) {
        let Some(name) = self
            .markers
            .get(id)
            .filter(|m| !m.is_dead())
            .map(|m| m.name.clone())
        else {
            log::debug!("Editor: marker {} is gone, not editing", id.raw());
            self.mode = Mode::Idle;
            return;
        };
        self.markers.start_edit(id);
        self.renamer.load(&name);
        self.mode = Mode::MarkerEdit;
    }

    /// Leave the rename; an unnamed marker is deleted instead of kept
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.markers.editing() {
            if self.markers.get(id).is_some_and(|m| m.name.is_empty()) {
                self.markers.soft_delete(id);
            }
        } else if self.mode != Mode::MarkerEdit {
            return;
        }
        self.markers.stop_edit();
        self.renamer.clear();
        self.mode = Mode::Idle;
        self.cursor = cursor_for(self.mode);
    }

    /// Commit the rename input. Empty text is ignored and the edit stays open.
    pub fn submit_rename(&mut self) -> bool {
        let Some(id) = self.markers.editing() else {
            return false;
        };
        if self.renamer.is_empty() {
            return false;
        }
        self.markers.rename(id, self.renamer.text());
        self.markers.stop_edit();
        self.renamer.clear();
        self.mode = Mode::Idle;
        self.cursor = cursor_for(self.mode);
        true
    }

    /// Leave `MarkerEdit` once the edited marker no longer exists
    fn release_orphaned_edit(&mut self) {
        if self.mode == Mode::MarkerEdit && !self.markers.is_editing() {
            log::debug!("Editor: edited marker removed, leaving MarkerEdit");
            self.renamer.clear();
            self.mode = Mode::Idle;
            self.cursor = cursor_for(self.mode);
        }
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press by name (see [`EditorKeybindings`])
    pub fn handle_key_event(&mut self, key: &str) {
        match self.keybindings.match_action(key) {
            Some(KeyAction::PlayPause) => self.toggle_playback(),
            Some(KeyAction::CancelEdit) => self.cancel_edit(),
            Some(KeyAction::NudgeBackward) => {
                self.collapse_renamer_selection();
                self.nudge_playhead(false);
            }
            Some(KeyAction::NudgeForward) => {
                self.collapse_renamer_selection();
                self.nudge_playhead(true);
            }
            None => {}
        }
    }

    fn collapse_renamer_selection(&mut self) {
        if self.markers.is_editing() {
            self.renamer.collapse_selection();
        }
    }

    fn nudge_playhead(&mut self, forward: bool) {
        if self.markers.is_editing() {
            return;
        }
        let step = self.track.samples_to_pcm(self.viewport.samples_per_px() as usize)
            * self.nudge_multiplier;
        let delta = if forward { step } else { -step };
        self.set_playhead(self.playhead.current_bytes() + delta);
    }

    fn toggle_playback(&mut self) {
        if self.markers.is_editing() {
            return;
        }
        if !self.transport.is_playing() {
            if self.playhead.at_end() {
                return;
            }
            self.transport.play();
            if !self.transport.wait_until_ready() {
                log::warn!("Editor: transport did not report ready after play");
            }
        } else {
            self.transport.pause();
            self.playhead.reset_to_snapshot();
            let snapshot = self.playhead.current_bytes();
            if let Err(e) = self.transport.seek_to_byte_offset(snapshot) {
                log::warn!("Editor: could not return transport to {}: {}", snapshot, e);
            }
        }
    }

    // =========================================================================
    // Playhead
    // =========================================================================

    /// Seek the transport to a byte offset and move the playhead there
    pub fn set_playhead(&mut self, bytes: i64) {
        let result = self.transport.seek_to_byte_offset(self.track.align_pcm(bytes));
        self.apply_seek(result);
    }

    fn seek_to_px(&mut self, x: f32) {
        let sample = self.viewport.px_to_samples(x);
        let seconds = self.track.samples_to_seconds(sample) as f32;
        let result = self.transport.seek_to_seconds(seconds);
        self.apply_seek(result);
    }

    fn seek_to_marker(&mut self, id: MarkerId) {
        if let Some(bytes) = self.markers.get(id).map(|m| m.timestamp_pcm) {
            self.set_playhead(bytes);
        }
    }

    fn apply_seek(&mut self, result: TransportResult<i64>) {
        match result {
            Ok(bytes) => self.playhead.set(bytes),
            Err(e) => log::warn!("Editor: seek failed, playhead unchanged: {}", e),
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Deferred work after input: drop dead markers, then follow the transport
    ///
    /// Returns true while playback is running and another redraw should be
    /// scheduled after [`refresh_interval`](Self::refresh_interval).
    pub fn end_frame(&mut self) -> bool {
        self.markers.compact();
        self.release_orphaned_edit();

        let exhausted = self.transport.take_exhausted();
        if exhausted || self.transport.is_playing() {
            if self.playhead.refresh(self.transport.bytes_read(), exhausted) {
                log::debug!("Editor: stream exhausted, pausing transport");
                self.transport.pause();
            }
        }
        self.transport.is_playing() && !self.playhead.at_end()
    }
}
