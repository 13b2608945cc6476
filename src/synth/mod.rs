// Purpose: the piano itself, one persistent voice per key
// Driven by the engine through the VoiceAllocator trait

pub mod keyboard;
pub mod voice;

pub use keyboard::Keyboard;
pub use voice::{KeyColor, Trace, Voice, VoiceState};
