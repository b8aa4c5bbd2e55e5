// Wireless link to the companion app.
//
// The radio stack calls back on its own context, so the callbacks never touch
// controller state: they push LinkEvents into a bounded channel and the poll
// loop applies them at the top of the next cycle.

use crossbeam_channel::{Receiver, Sender};
use log::warn;

const LINK_CHANNEL_DEPTH: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    // one raw notification/write from the peer
    Packet(Vec<u8>),
}

/// Pairing callbacks from the radio stack
pub trait PairingListener {
    fn on_connect(&self);
    fn on_disconnect(&self);
}

/// Data callbacks from the radio stack
pub trait PacketListener {
    fn on_packet(&self, data: &[u8]);
}

/// Callback side of the link. Cheap to clone, safe to call from any thread.
#[derive(Clone)]
pub struct LinkBridge {
    tx: Sender<LinkEvent>,
}

impl LinkBridge {
    pub fn send(&self, event: LinkEvent) {
        if self.tx.try_send(event).is_err() {
            warn!("link event dropped, inbox full");
        }
    }
}

impl PairingListener for LinkBridge {
    fn on_connect(&self) {
        self.send(LinkEvent::Connected);
    }

    fn on_disconnect(&self) {
        self.send(LinkEvent::Disconnected);
    }
}

impl PacketListener for LinkBridge {
    fn on_packet(&self, data: &[u8]) {
        self.send(LinkEvent::Packet(data.to_vec()));
    }
}

/// Poll-loop side of the link
pub struct LinkInbox {
    rx: Receiver<LinkEvent>,
}

impl LinkInbox {
    /// Everything that arrived since the last call, in arrival order
    pub fn drain(&self) -> impl Iterator<Item = LinkEvent> + '_ {
        self.rx.try_iter()
    }
}

pub fn link_channel() -> (LinkBridge, LinkInbox) {
    let (tx, rx) = crossbeam_channel::bounded::<LinkEvent>(LINK_CHANNEL_DEPTH);
    (LinkBridge { tx }, LinkInbox { rx })
}

/// Connection bookkeeping owned by the controller
#[derive(Clone, Debug, Default)]
pub struct ConnectionState {
    pub paired: bool,
    pub connected_at: u64,
    pub last_heartbeat_sent: u64,
    pub last_heartbeat_received: Option<u64>,
    // waiting out the settle delay before the resync is queued
    pub resync_pending: bool,
    // resync entries are still draining
    pub resync_active: bool,
}

impl ConnectionState {
    pub fn connect(&mut self, now: u64) {
        self.paired = true;
        self.connected_at = now;
        self.last_heartbeat_sent = now;
        self.resync_pending = true;
        self.resync_active = false;
    }

    pub fn disconnect(&mut self) {
        self.paired = false;
        self.resync_pending = false;
        self.resync_active = false;
    }

    // bar sync and other live chatter hold off while the peer is catching up
    pub fn resyncing(&self) -> bool {
        self.resync_pending || self.resync_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_arrive_in_order() {
        let (bridge, inbox) = link_channel();
        bridge.on_connect();
        bridge.on_packet(&[0x80, 0x80, 0xB0, 0x52, 127]);
        bridge.on_disconnect();

        let events: Vec<_> = inbox.drain().collect();
        assert_eq!(
            events,
            vec![
                LinkEvent::Connected,
                LinkEvent::Packet(vec![0x80, 0x80, 0xB0, 0x52, 127]),
                LinkEvent::Disconnected,
            ]
        );
        assert_eq!(inbox.drain().count(), 0);
    }

    #[test]
    fn full_inbox_drops_instead_of_blocking() {
        let (bridge, inbox) = link_channel();
        for _ in 0..LINK_CHANNEL_DEPTH + 10 {
            bridge.on_connect();
        }
        assert_eq!(inbox.drain().count(), LINK_CHANNEL_DEPTH);
    }

    #[test]
    fn bridge_works_across_threads() {
        let (bridge, inbox) = link_channel();
        let remote = bridge.clone();
        std::thread::spawn(move || remote.on_packet(&[1, 2, 3]))
            .join()
            .unwrap();
        assert_eq!(inbox.drain().next(), Some(LinkEvent::Packet(vec![1, 2, 3])));
    }

    #[test]
    fn connection_flags() {
        let mut conn = ConnectionState::default();
        conn.connect(1000);
        assert!(conn.paired && conn.resyncing());
        conn.disconnect();
        assert!(!conn.paired && !conn.resyncing());
    }
}
