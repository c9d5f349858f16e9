//! Shows one short notice through the desktop notification center.
use bridgekit_notification::{Notice, Notifier, SystemNotifier};

fn main() {
    println!("Sending notice...");
    SystemNotifier::new("bridgekit").notify(Notice::short("Microphone enabled"));
    println!("Notice sent.");
}
