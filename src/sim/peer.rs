// A stand-in for the companion app, on its own thread like a real radio stack.
// It pairs on request, echoes the pad's notes back after a short delay (the way
// the app monitors them), answers heartbeats and plays transport/tempo.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info};
use strikepad::midi::ble;
use strikepad::midi::control::{CC_HEARTBEAT, CC_PLAY, CC_TEMPO};
use strikepad::sequencer::{MAX_BPM, MIN_BPM};
use strikepad::{Control, LinkBridge, MidiMessage, PacketListener, PairingListener, SimulatorSettings};

const IDLE_WAIT: Duration = Duration::from_millis(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerCommand {
    TogglePair,
    TogglePlay,
    Tempo(i16),
    Quit,
}

pub struct PeerHandle {
    tx: Sender<PeerCommand>,
    to_peer: Sender<Vec<u8>>,
    join: Option<JoinHandle<()>>,
}

impl PeerHandle {
    pub fn send(&self, cmd: PeerCommand) {
        let _ = self.tx.try_send(cmd);
    }

    /// Where the board forwards outbound notifications
    pub fn packet_sender(&self) -> Sender<Vec<u8>> {
        self.to_peer.clone()
    }

    pub fn shutdown(mut self) {
        self.send(PeerCommand::Quit);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

pub fn spawn_peer(bridge: LinkBridge, settings: &SimulatorSettings) -> PeerHandle {
    let (tx, rx) = crossbeam_channel::bounded::<PeerCommand>(64);
    let (to_peer, packets) = crossbeam_channel::bounded::<Vec<u8>>(256);
    let echo_delay = Duration::from_millis(settings.echo_delay_ms);

    let join = std::thread::spawn(move || {
        let mut app = App {
            bridge,
            paired: false,
            playing: false,
            bpm: 120,
            echo_delay,
            echoes: Vec::new(),
        };
        app.run(rx, packets);
    });

    PeerHandle {
        tx,
        to_peer,
        join: Some(join),
    }
}

struct App {
    bridge: LinkBridge,
    paired: bool,
    playing: bool,
    bpm: u8,
    echo_delay: Duration,
    // (due, packet) notes waiting to be echoed
    echoes: Vec<(Instant, Vec<u8>)>,
}

impl App {
    fn run(&mut self, commands: Receiver<PeerCommand>, packets: Receiver<Vec<u8>>) {
        loop {
            match commands.recv_timeout(IDLE_WAIT) {
                Ok(PeerCommand::Quit) | Err(RecvTimeoutError::Disconnected) => return,
                Ok(cmd) => self.command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
            }
            for packet in packets.try_iter() {
                if self.paired {
                    self.receive(&packet);
                }
            }
            self.flush_echoes(Instant::now());
        }
    }

    fn command(&mut self, cmd: PeerCommand) {
        match cmd {
            PeerCommand::TogglePair => {
                self.paired = !self.paired;
                self.echoes.clear();
                if self.paired {
                    info!("sim app: connecting");
                    self.bridge.on_connect();
                } else {
                    info!("sim app: disconnecting");
                    self.bridge.on_disconnect();
                }
            }
            PeerCommand::TogglePlay if self.paired => {
                self.playing = !self.playing;
                self.send(Control::Play(self.playing));
            }
            PeerCommand::Tempo(delta) if self.paired => {
                let bpm = (self.bpm as i16 + delta).clamp(MIN_BPM as i16, MAX_BPM as i16);
                self.bpm = bpm as u8;
                self.send(Control::tempo(self.bpm));
            }
            _ => {}
        }
    }

    fn receive(&mut self, packet: &[u8]) {
        let Ok(msg) = ble::decode(packet) else {
            return;
        };
        match msg {
            MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. } => {
                self.echoes.push((Instant::now() + self.echo_delay, packet.to_vec()));
            }
            MidiMessage::ControlChange { controller, value, .. } => match controller {
                CC_HEARTBEAT => self.send(Control::Heartbeat),
                // keep our transport in step with resync dumps
                CC_PLAY => self.playing = value > 0,
                CC_TEMPO => self.bpm = (MIN_BPM as u16 + value as u16).min(MAX_BPM as u16) as u8,
                _ => debug!("sim app: cc {controller:#04x} = {value}"),
            },
            MidiMessage::ProgramChange { .. } => {}
        }
    }

    fn flush_echoes(&mut self, now: Instant) {
        let (due, later): (Vec<_>, Vec<_>) = self.echoes.drain(..).partition(|(at, _)| *at <= now);
        self.echoes = later;
        for (_, packet) in due {
            self.bridge.on_packet(&packet);
        }
    }

    fn send(&self, control: Control) {
        let (controller, value) = control.encode();
        let packet = ble::BlePacket::encode(MidiMessage::cc(controller, value), 0);
        self.bridge.on_packet(packet.as_bytes());
    }
}
