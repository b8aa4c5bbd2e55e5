// The controller. Owns every piece of device state and runs one cooperative
// poll cycle at a time; nothing in here blocks or sleeps.
//
// Cycle order (later stages read what earlier ones just changed):
//   link events -> sync queue -> key scan -> gestures / long press / wired
//   combo -> sequencer -> solenoid aging + LED frame -> heartbeat
//
// Outputs never go straight to hardware: each poll returns DeviceCommands for
// the host to dispatch.

use log::{debug, info, trace, warn};

use crate::config::DeviceConfig;
use crate::device_api::{DeviceCommand, KeyLines};
use crate::input::{Gesture, GestureDetector, KeyEvent, KeyScanner, LongPress, WiredModeDetector};
use crate::leds::{LedRenderer, RenderView, FULL};
use crate::link::{ConnectionState, LinkEvent, LinkInbox};
use crate::midi::wired::key_for_note;
use crate::midi::{ble, BlePacket, Control, MidiMessage, NoteGrouping, WiredSynth};
use crate::pattern::PatternGrid;
use crate::sequencer::{Sequencer, MIN_BPM};
use crate::shared::{ButtonId, DisplayState, KeyId, Mode, Step};
use crate::solenoid::SolenoidBank;
use crate::sync_queue::{SyncQueue, SETTLE_MS};

/// Tempo forced when Wired Mode starts
pub const WIRED_BPM: u8 = 120;

pub struct Middle {
    config: DeviceConfig,
    mode: Mode,
    grid: PatternGrid,
    sequencer: Sequencer,
    solenoids: SolenoidBank,
    leds: LedRenderer,
    last_frame_at: Option<u64>,
    scanner: KeyScanner,
    gestures: GestureDetector,
    long_press: LongPress,
    wired_mode: WiredModeDetector,
    synth: WiredSynth,
    grouping: NoteGrouping,
    link: ConnectionState,
    sync: SyncQueue,
}

impl Middle {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            mode: Mode::default(),
            grid: PatternGrid::new(),
            sequencer: Sequencer::new(config.default_bpm),
            solenoids: SolenoidBank::new(),
            leds: LedRenderer::new(config.indicator_fade_ms),
            last_frame_at: None,
            scanner: KeyScanner::new(),
            gestures: GestureDetector::new(),
            long_press: LongPress::new(),
            wired_mode: WiredModeDetector::new(),
            synth: WiredSynth::new(&config),
            grouping: NoteGrouping::new(),
            link: ConnectionState::default(),
            sync: SyncQueue::new(),
            config,
        }
    }

    /// Runs one full cycle at `now` (monotonic ms).
    pub fn poll<L: KeyLines + ?Sized>(&mut self, now: u64, lines: &mut L, inbox: &LinkInbox) -> Vec<DeviceCommand> {
        let mut out = Vec::new();

        for event in inbox.drain() {
            self.apply_link_event(event, now, &mut out);
        }
        self.service_sync(now, &mut out);

        for event in self.scanner.scan(lines, now) {
            self.handle_key_event(event, now, &mut out);
        }
        self.run_detectors(now, &mut out);

        if let Some(step) = self.sequencer.tick(now) {
            self.on_step(step, now, &mut out);
        }

        self.solenoids.age(now, &mut out);
        self.render_frame(now, &mut out);
        self.send_heartbeat(now, &mut out);
        out
    }

    /// Applies a single link event outside of a poll, e.g. from a test.
    pub fn handle_link_event(&mut self, event: LinkEvent, now: u64) -> Vec<DeviceCommand> {
        let mut out = Vec::new();
        self.apply_link_event(event, now, &mut out);
        out
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            mode: self.mode,
            bpm: self.sequencer.bpm(),
            playing: self.sequencer.is_running(),
            current_step: self.sequencer.current_step().get(),
            paired: self.link.paired,
            wired_mode: self.wired_mode.is_active(),
            resyncing: self.link.resyncing(),
            peer_recording: self.grouping.is_recording(),
            active_solenoids: self.solenoids.active_count(),
            sync_queue_len: self.sync.len(),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &PatternGrid {
        &self.grid
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn solenoids(&self) -> &SolenoidBank {
        &self.solenoids
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.link
    }

    pub fn is_paired(&self) -> bool {
        self.link.paired
    }

    pub fn wired_active(&self) -> bool {
        self.wired_mode.is_active()
    }

    pub fn sync_len(&self) -> usize {
        self.sync.len()
    }

    // ── link ──────────────────────────────────────────────────────

    fn apply_link_event(&mut self, event: LinkEvent, now: u64, out: &mut Vec<DeviceCommand>) {
        match event {
            LinkEvent::Connected => {
                info!("peer connected");
                self.link.connect(now);
                self.sync.clear();
                self.grouping.reset();
                // the app takes over from autonomous playback
                if self.wired_mode.force_off() {
                    info!("wired mode off: peer connected");
                    self.sequencer.stop();
                    self.all_notes_off(out);
                }
            }
            LinkEvent::Disconnected => {
                info!("peer disconnected");
                self.link.disconnect();
                self.sync.clear();
                self.grouping.reset();
            }
            LinkEvent::Packet(data) => match ble::decode(&data) {
                Ok(msg) => {
                    trace!("rx {msg:?}");
                    self.handle_midi(msg, now, out);
                }
                Err(e) => debug!("dropping packet {data:02x?}: {e}"),
            },
        }
    }

    fn handle_midi(&mut self, msg: MidiMessage, now: u64, out: &mut Vec<DeviceCommand>) {
        match msg {
            MidiMessage::NoteOn { note, velocity, .. } if velocity > 0 => self.note_from_peer(note, now, out),
            MidiMessage::NoteOn { note, .. } | MidiMessage::NoteOff { note, .. } => {
                if let Some(key) = key_for_note(note) {
                    self.leds.set_flash(key, 0);
                }
            }
            MidiMessage::ControlChange { controller, value, .. } => match Control::decode(controller, value) {
                Some(control) => self.apply_control(control, now),
                None => trace!("unknown control {controller:#04x}"),
            },
            MidiMessage::ProgramChange { .. } => {}
        }
    }

    fn note_from_peer(&mut self, note: u8, now: u64, out: &mut Vec<DeviceCommand>) {
        if self.mode.is_drum() {
            return;
        }
        let Some(key) = key_for_note(note) else {
            return;
        };
        let grouping = self.grouping.classify(self.scanner.physical_press_at(key), now);
        trace!("note {note} -> {grouping:?}");
        if grouping.reacts() {
            self.leds.set_flash(key, FULL);
            self.strike(key, now, out);
        }
    }

    fn apply_control(&mut self, control: Control, now: u64) {
        match control {
            Control::SelectMode(mode) => self.set_mode(mode),
            Control::StepState { step, on } => {
                if let Some(track) = self.mode.track() {
                    self.grid.set(track, step, on);
                }
            }
            Control::Play(true) => self.sequencer.start(now),
            Control::Play(false) => self.sequencer.stop(),
            Control::Tempo(value) => self.sequencer.set_bpm(MIN_BPM as i32 + value as i32),
            Control::FullReset => {
                info!("pattern reset by peer");
                self.grid.clear_all();
            }
            Control::StateRequest => self.queue_resync(now),
            Control::Heartbeat => self.link.last_heartbeat_received = Some(now),
            Control::Record(value) => self.grouping.set_recording(value > 0),
            Control::PatternDatum { track, step } => self.grid.set(track, step, true),
            // only ever sent by us
            Control::SyncStart | Control::BarSync(_) => {}
        }
    }

    fn queue_resync(&mut self, now: u64) {
        let queued = self.sync.queue_resync(
            self.mode,
            self.sequencer.bpm(),
            self.sequencer.is_running(),
            &self.grid,
            now,
        );
        self.link.resync_pending = false;
        self.link.resync_active = true;
        info!("resync: {queued} entries queued");
    }

    fn service_sync(&mut self, now: u64, out: &mut Vec<DeviceCommand>) {
        if self.link.paired && self.link.resync_pending && now.saturating_sub(self.link.connected_at) >= SETTLE_MS {
            self.queue_resync(now);
        }
        if let Some(entry) = self.sync.pop_ready(now) {
            self.notify(MidiMessage::cc(entry.control, entry.value), now, out);
        }
        if self.sync.take_completion() && self.link.resync_active {
            self.link.resync_active = false;
            info!("resync complete");
        }
    }

    fn send_heartbeat(&mut self, now: u64, out: &mut Vec<DeviceCommand>) {
        if self.link.paired && now.saturating_sub(self.link.last_heartbeat_sent) >= self.config.heartbeat_ms {
            self.link.last_heartbeat_sent = now;
            self.notify_control(Control::Heartbeat, now, out);
        }
    }

    // ── local input ───────────────────────────────────────────────

    fn handle_key_event(&mut self, event: KeyEvent, now: u64, out: &mut Vec<DeviceCommand>) {
        match event {
            KeyEvent::KeyPressed(key) => match self.mode.track() {
                Some(track) => {
                    let step = key.step();
                    let on = self.grid.toggle(track, step);
                    self.notify_control(Control::StepState { step, on }, now, out);
                }
                None => {
                    self.leds.set_flash(key, FULL);
                    let msg = self.synth.note_on(key);
                    self.notify(msg, now, out);
                    self.wired(msg, out);
                }
            },
            KeyEvent::KeyReleased(key) => {
                if !self.mode.is_drum() {
                    self.leds.set_flash(key, 0);
                    let msg = self.synth.note_off(key);
                    self.notify(msg, now, out);
                    self.wired(msg, out);
                }
            }
            KeyEvent::ButtonPressed(button) => {
                self.long_press.press(button);
                let mode = button.mode();
                self.set_mode(mode);
                self.notify_control(Control::SelectMode(mode), now, out);
                if let Some(program) = self.synth.program_for(mode) {
                    self.wired(program, out);
                }
            }
            KeyEvent::ButtonReleased(button) => {
                if self.long_press.release(button) && records(button) {
                    self.notify_control(Control::Record(0), now, out);
                }
            }
        }
    }

    fn run_detectors(&mut self, now: u64, out: &mut Vec<DeviceCommand>) {
        match self.gestures.update(&self.scanner, now) {
            Some(Gesture::FullReset) => {
                info!("full reset");
                self.grid.clear_all();
                self.notify_control(Control::FullReset, now, out);
            }
            Some(Gesture::ClearTrack) => self.clear_selected_track(now),
            None => {}
        }

        for button in self.long_press.update(&self.scanner, now) {
            if records(button) {
                self.notify_control(Control::Record(button.mode().index()), now, out);
            }
        }

        match self.wired_mode.update(&self.scanner, self.link.paired, now) {
            Some(true) => {
                info!("wired mode on");
                self.sequencer.set_bpm(WIRED_BPM as i32);
                self.sequencer.start(now);
                self.leds.invalidate();
                if let Some(program) = self.synth.program_for(self.mode) {
                    out.push(DeviceCommand::Wired(program));
                }
            }
            Some(false) => {
                info!("wired mode off");
                self.sequencer.stop();
                self.all_notes_off(out);
                self.leds.invalidate();
            }
            None => {}
        }
    }

    fn clear_selected_track(&mut self, now: u64) {
        let Some(track) = self.mode.track() else {
            return;
        };
        let cleared = self.grid.clear_track(track);
        info!("cleared track {} ({} steps)", track.get(), cleared.len());
        if !self.link.paired {
            return;
        }
        // the peer hears about it at queue pace, not all at once
        for step in cleared {
            if let Err(e) = self.sync.push_control(Control::StepState { step, on: false }, now) {
                warn!("track clear: {e}");
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!("mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
        self.leds.clear_transients();
        self.sequencer.clear_indicator();
    }

    // ── playback and output ───────────────────────────────────────

    fn on_step(&mut self, step: Step, now: u64, out: &mut Vec<DeviceCommand>) {
        if let Some(selected) = self.mode.track() {
            let hits: Vec<_> = self.grid.hits_at(step).collect();
            for track in hits {
                self.wired(self.synth.drum_hit(track), out);
                // other tracks only sound on the wired synth
                if track == selected {
                    self.strike(step.key(), now, out);
                }
            }
        }
        if self.link.paired && !self.link.resyncing() {
            self.notify_control(Control::BarSync(step), now, out);
        }
    }

    fn render_frame(&mut self, now: u64, out: &mut Vec<DeviceCommand>) {
        if self
            .last_frame_at
            .is_some_and(|t| now.saturating_sub(t) < self.config.frame_ms)
        {
            return;
        }
        self.last_frame_at = Some(now);
        let view = RenderView {
            paired: self.link.paired,
            wired_mode: self.wired_mode.is_active(),
            mode: self.mode,
            grid: &self.grid,
            running: self.sequencer.is_running(),
            indicator: self.sequencer.indicator(),
        };
        self.leds.render(&view, now, out);
    }

    fn strike(&mut self, key: KeyId, now: u64, out: &mut Vec<DeviceCommand>) {
        if let Err(e) = self.solenoids.strike(key, now, out) {
            warn!("strike on key {} dropped: {e}", key.get());
        }
    }

    fn notify(&self, msg: MidiMessage, now: u64, out: &mut Vec<DeviceCommand>) {
        if self.link.paired {
            out.push(DeviceCommand::Notify(BlePacket::encode(msg, now)));
        }
    }

    fn notify_control(&self, control: Control, now: u64, out: &mut Vec<DeviceCommand>) {
        let (controller, value) = control.encode();
        self.notify(MidiMessage::cc(controller, value), now, out);
    }

    fn wired(&self, msg: MidiMessage, out: &mut Vec<DeviceCommand>) {
        if self.wired_mode.is_active() {
            out.push(DeviceCommand::Wired(msg));
        }
    }

    fn all_notes_off(&self, out: &mut Vec<DeviceCommand>) {
        out.extend(self.synth.all_notes_off().map(DeviceCommand::Wired));
    }
}

// long-press recording is only a thing for the synth voices
fn records(button: ButtonId) -> bool {
    !button.mode().is_drum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::scanner::tests::FakeLines;
    use crate::link::{link_channel, LinkBridge, PacketListener, PairingListener};
    use crate::midi::ble::timestamp_byte;
    use crate::midi::control::{CC_BAR_SYNC, CC_HEARTBEAT, CC_PATTERN, CC_RECORD, CC_RESET, CC_STEP_FIRST};
    use crate::shared::TrackId;

    struct Rig {
        middle: Middle,
        lines: FakeLines,
        bridge: LinkBridge,
        inbox: LinkInbox,
    }

    impl Rig {
        fn new() -> Self {
            let (bridge, inbox) = link_channel();
            Self {
                middle: Middle::new(DeviceConfig::default()),
                lines: FakeLines::default(),
                bridge,
                inbox,
            }
        }

        fn poll(&mut self, now: u64) -> Vec<DeviceCommand> {
            self.middle.poll(now, &mut self.lines, &self.inbox)
        }

        fn cc(&self, controller: u8, value: u8) {
            self.bridge.on_packet(&[0x80, 0x80, 0xB0, controller, value]);
        }

        fn note_on(&self, note: u8, velocity: u8) {
            self.bridge.on_packet(&[0x80, 0x80, 0x90, note, velocity]);
        }
    }

    // every wireless control sent, as (controller, value)
    fn notified_ccs(cmds: &[DeviceCommand]) -> Vec<(u8, u8)> {
        cmds.iter()
            .filter_map(|c| match c {
                DeviceCommand::Notify(p) => match p.decode().ok()? {
                    MidiMessage::ControlChange { controller, value, .. } => Some((controller, value)),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    fn struck(cmds: &[DeviceCommand], key: u8) -> bool {
        let channel = KeyId::new(key).unwrap().solenoid();
        cmds.contains(&DeviceCommand::Solenoid { channel, on: true })
    }

    #[test]
    fn unpaired_device_never_notifies() {
        let mut rig = Rig::new();
        rig.lines.matrix[2] = true;
        let cmds = rig.poll(0);
        assert!(!cmds.iter().any(|c| matches!(c, DeviceCommand::Notify(_))));
        assert!(rig.middle.grid().get(TrackId::new(0).unwrap(), Step::new(2).unwrap()));
    }

    #[test]
    fn drum_press_toggles_and_reports_the_step() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.poll(0);

        rig.lines.matrix[6] = true;
        let cmds = rig.poll(10);
        assert_eq!(notified_ccs(&cmds), vec![(CC_STEP_FIRST + 6, 127)]);

        rig.lines.matrix[6] = false;
        rig.poll(20);
        rig.lines.matrix[6] = true;
        let cmds = rig.poll(30);
        assert_eq!(notified_ccs(&cmds), vec![(CC_STEP_FIRST + 6, 0)]);
    }

    #[test]
    fn resync_waits_for_the_settle_delay() {
        let mut rig = Rig::new();
        rig.middle.grid.set(TrackId::new(1).unwrap(), Step::new(3).unwrap(), true);
        rig.bridge.on_connect();
        rig.poll(1000);
        assert!(rig.middle.display_state().resyncing);
        assert_eq!(rig.middle.sync_len(), 0);

        rig.poll(1499);
        assert_eq!(rig.middle.sync_len(), 0);

        let cmds = rig.poll(1500);
        // first entry goes out in the same cycle it was queued
        assert_eq!(notified_ccs(&cmds)[0], (0x51, 127));
        assert_eq!(rig.middle.sync_len(), 4);

        let mut sent = Vec::new();
        for now in 1501..1700 {
            sent.extend(notified_ccs(&rig.poll(now)));
        }
        assert_eq!(sent.last(), Some(&(CC_PATTERN, 0x13)));
        assert!(!rig.middle.display_state().resyncing);
    }

    #[test]
    fn no_bar_sync_while_resyncing() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.cc(0x40, 127);
        let cmds = rig.poll(0);
        assert!(!notified_ccs(&cmds).iter().any(|&(c, _)| c == CC_BAR_SYNC));
    }

    #[test]
    fn heartbeat_every_interval_while_paired() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.poll(0);
        let beats = (1..=4100)
            .flat_map(|now| notified_ccs(&rig.poll(now)))
            .filter(|&(c, _)| c == CC_HEARTBEAT)
            .count();
        assert_eq!(beats, 2);

        rig.cc(CC_HEARTBEAT, 127);
        rig.poll(4200);
        assert_eq!(rig.middle.connection().last_heartbeat_received, Some(4200));
    }

    #[test]
    fn peer_notes_react_only_when_grouped() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.cc(5, 127); // LEAD
        rig.poll(0);
        assert_eq!(rig.middle.mode(), Mode::Lead);

        // a lone note from the app is ignored
        rig.note_on(64, 100);
        let cmds = rig.poll(5000);
        assert!(!struck(&cmds, 4));

        // our own press echoed back strikes
        rig.lines.matrix[4] = true;
        rig.poll(6000);
        rig.note_on(64, 100);
        let cmds = rig.poll(6040);
        assert!(struck(&cmds, 4));
        assert_eq!(rig.middle.leds.flash(KeyId::new(4).unwrap()), FULL);

        // velocity 0 is a note-off
        rig.note_on(64, 0);
        rig.poll(6100);
        assert_eq!(rig.middle.leds.flash(KeyId::new(4).unwrap()), 0);
    }

    #[test]
    fn synth_keys_go_over_the_air_when_paired() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.cc(5, 127); // LEAD
        rig.poll(0);
        let ch = rig.middle.config().synth_channel & 0x0F;
        let velocity = rig.middle.config().velocity;
        let key = KeyId::new(3).unwrap();

        rig.lines.matrix[3] = true;
        let cmds = rig.poll(100);
        let on = [0x80, timestamp_byte(100), 0x90 | ch, 63, velocity];
        assert!(cmds.iter().any(|c| matches!(c, DeviceCommand::Notify(p) if p.as_bytes() == on)));
        assert!(!cmds.iter().any(|c| matches!(c, DeviceCommand::Wired(_))));
        assert_eq!(rig.middle.leds.flash(key), FULL);

        rig.lines.matrix[3] = false;
        let cmds = rig.poll(200);
        let off = [0x80, timestamp_byte(200), 0x80 | ch, 63];
        assert!(cmds.iter().any(|c| matches!(c, DeviceCommand::Notify(p) if p.as_bytes() == off)));
        assert!(!cmds.iter().any(|c| matches!(c, DeviceCommand::Wired(_))));
        assert_eq!(rig.middle.leds.flash(key), 0);
    }

    #[test]
    fn synth_keys_play_the_wired_synth_in_wired_mode() {
        let mut rig = Rig::new();
        rig.lines.buttons[0] = true;
        rig.lines.buttons[7] = true;
        for now in 0..=300 {
            rig.poll(now);
        }
        assert!(rig.middle.wired_active());
        assert_eq!(rig.middle.mode(), Mode::Bell);
        rig.lines.buttons[0] = false;
        rig.lines.buttons[7] = false;
        rig.poll(310);

        let ch = rig.middle.config().synth_channel & 0x0F;
        let velocity = rig.middle.config().velocity;
        rig.lines.matrix[2] = true;
        let cmds = rig.poll(320);
        assert!(cmds.contains(&DeviceCommand::Wired(MidiMessage::NoteOn { channel: ch, note: 62, velocity })));
        assert!(!cmds.iter().any(|c| matches!(c, DeviceCommand::Notify(_))));
        assert_eq!(rig.middle.leds.flash(KeyId::new(2).unwrap()), FULL);

        rig.lines.matrix[2] = false;
        let cmds = rig.poll(330);
        assert!(cmds.contains(&DeviceCommand::Wired(MidiMessage::NoteOff { channel: ch, note: 62 })));
        assert_eq!(rig.middle.leds.flash(KeyId::new(2).unwrap()), 0);
    }

    #[test]
    fn recording_flag_from_peer() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.cc(6, 127); // PLUCK
        rig.cc(CC_RECORD, 1);
        rig.poll(0);
        assert!(rig.middle.display_state().peer_recording);

        rig.note_on(62, 90);
        assert!(struck(&rig.poll(3000), 2));
    }

    #[test]
    fn long_press_only_records_synth_modes() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.poll(0);
        let record_ccs = |rig: &mut Rig, now: u64| -> Vec<(u8, u8)> {
            notified_ccs(&rig.poll(now))
                .into_iter()
                .filter(|&(c, _)| c == CC_RECORD)
                .collect()
        };

        rig.lines.buttons[2] = true; // HAT
        rig.poll(10);
        assert!(record_ccs(&mut rig, 600).is_empty());
        rig.lines.buttons[2] = false;
        assert!(record_ccs(&mut rig, 700).is_empty());

        rig.lines.buttons[6] = true; // PLUCK
        rig.poll(800);
        assert!(record_ccs(&mut rig, 1299).is_empty());
        assert_eq!(record_ccs(&mut rig, 1300), vec![(CC_RECORD, 6)]);
        rig.lines.buttons[6] = false;
        assert_eq!(record_ccs(&mut rig, 1400), vec![(CC_RECORD, 0)]);
    }

    #[test]
    fn corner_buttons_reset_everything() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.poll(0);
        rig.middle.grid.set(TrackId::new(3).unwrap(), Step::new(9).unwrap(), true);

        for b in [0, 3, 4, 7] {
            rig.lines.buttons[b] = true;
        }
        let cmds = rig.poll(10);
        assert_eq!(rig.middle.grid().count(), 0);
        assert!(notified_ccs(&cmds).contains(&(CC_RESET, 127)));
    }

    #[test]
    fn malformed_packets_change_nothing() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.bridge.on_packet(&[0x80, 0x80, 0xB0, 0x41]);
        rig.bridge.on_packet(&[0x00]);
        rig.poll(0);
        assert_eq!(rig.middle.sequencer().bpm(), 120);
    }

    #[test]
    fn disconnect_drops_the_queue() {
        let mut rig = Rig::new();
        rig.bridge.on_connect();
        rig.poll(0);
        rig.poll(500);
        assert!(rig.middle.sync_len() > 0);
        rig.bridge.on_disconnect();
        rig.poll(510);
        assert_eq!(rig.middle.sync_len(), 0);
        assert!(!rig.middle.display_state().resyncing);
    }
}
