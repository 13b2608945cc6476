//! Human-readable names used when describing events.

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Controller names indexed by controller number (General MIDI).
pub fn controller_name(controller: u8) -> Option<&'static str> {
    let name = match controller {
        0 | 32 => "Bank Select",
        1 | 33 => "Modulation Wheel",
        2 | 34 => "Breath Controller",
        4 | 36 => "Foot Controller",
        5 | 37 => "Portamento Time",
        6 | 38 => "Data Entry",
        7 | 39 => "Channel Volume",
        8 | 40 => "Balance",
        10 | 42 => "Pan",
        11 | 43 => "Expression Controller",
        12 | 44 => "Effect Control 1",
        13 | 45 => "Effect Control 2",
        16 => "Gen Purpose Controller 1",
        17 => "Gen Purpose Controller 2",
        18 => "Gen Purpose Controller 3",
        19 => "Gen Purpose Controller 4",
        48 => "General Purpose Controller 1",
        49 => "General Purpose Controller 2",
        50 => "General Purpose Controller 3",
        51 => "General Purpose Controller 4",
        64 => "Sustain On/Off",
        65 => "Portamento On/Off",
        66 => "Sostenuto On/Off",
        67 => "Soft Pedal On/Off",
        68 => "Legato On/Off",
        69 => "Hold 2 On/Off",
        70 => "Sound Controller 1",
        71 => "Sound Controller 2",
        72 => "Sound Controller 3",
        73 => "Sound Controller 4",
        74 => "Sound Controller 5",
        75 => "Sound Controller 6",
        76 => "Sound Controller 7",
        77 => "Sound Controller 8",
        78 => "Sound Controller 9",
        79 => "Sound Controller 10",
        80 => "General Purpose Controller 5",
        81 => "General Purpose Controller 6",
        82 => "General Purpose Controller 7",
        83 => "General Purpose Controller 8",
        84 => "Portamento Control",
        88 => "High Resolution Velocity Prefix",
        91 => "Effects 1 Depth",
        92 => "Effects 2 Depth",
        93 => "Effects 3 Depth",
        94 => "Effects 4 Depth",
        95 => "Effects 5 Depth",
        96 => "Data Increment",
        97 => "Data Decrement",
        98 => "Non Registered Parameter Number 1",
        99 => "Non Registered Parameter Number 2",
        100 => "Registered Parameter Number 1",
        101 => "Registered Parameter Number 2",
        120 => "All Sound Off",
        121 => "Reset All Controllers",
        122 => "Local Control On/Off",
        123 => "All Notes Off",
        124 => "Omni Mode Off",
        125 => "Omni Mode On",
        126 => "Mono Mode On",
        127 => "Poly Mode On",
        _ => return None,
    };
    Some(name)
}
