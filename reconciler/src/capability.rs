use std::fmt;

use bridgekit_permission::Permission;

const AUDIO_CAPTURE: &str = "android.webkit.resource.AUDIO_CAPTURE";
const VIDEO_CAPTURE: &str = "android.webkit.resource.VIDEO_CAPTURE";
const PROTECTED_MEDIA_ID: &str = "android.webkit.resource.PROTECTED_MEDIA_ID";
const MIDI_SYSEX: &str = "android.webkit.resource.MIDI_SYSEX";

/// A resource embedded web content can ask the web view for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Microphone input (`getUserMedia({ audio })`).
    AudioCapture,
    /// Camera input (`getUserMedia({ video })`).
    VideoCapture,
    /// Protected media identifiers for encrypted playback.
    ProtectedMediaId,
    /// MIDI system-exclusive messages.
    MidiSysex,
    /// A resource string this crate does not know.
    Other(String),
}

impl Capability {
    /// The web view's resource string for this capability.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::AudioCapture => AUDIO_CAPTURE,
            Self::VideoCapture => VIDEO_CAPTURE,
            Self::ProtectedMediaId => PROTECTED_MEDIA_ID,
            Self::MidiSysex => MIDI_SYSEX,
            Self::Other(resource) => resource,
        }
    }

    /// Parse a web view resource string. Unknown strings are kept verbatim.
    #[must_use]
    pub fn from_resource(resource: &str) -> Self {
        match resource {
            AUDIO_CAPTURE => Self::AudioCapture,
            VIDEO_CAPTURE => Self::VideoCapture,
            PROTECTED_MEDIA_ID => Self::ProtectedMediaId,
            MIDI_SYSEX => Self::MidiSysex,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The OS permission backing this capability.
    ///
    /// `None` means the capability needs no OS grant and is always satisfied.
    #[must_use]
    pub const fn required_permission(&self) -> Option<Permission> {
        match self {
            Self::AudioCapture => Some(Permission::RecordAudio),
            Self::VideoCapture => Some(Permission::Camera),
            Self::ProtectedMediaId | Self::MidiSysex | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}
