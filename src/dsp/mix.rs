//! Output-frame mixing.

/*
Decaying Accumulation
=====================

Voices are not summed. Each sounding voice folds itself into one channel of
the output frame like this:

    slot = slot / 2 + sample / 2

so the most recently mixed voice always contributes half of the channel,
the one before it a quarter, and so on.

    voices mixed:   A        B        C
    weight of A:   1/2      1/4      1/8
    weight of B:    -       1/2      1/4
    weight of C:    -        -       1/2

Properties worth knowing:

  - The result can never leave the 16-bit range, no matter how many voices
    are playing, so there is no clipping stage.
  - It is ORDER DEPENDENT. Voices are mixed in ascending key order, which
    makes the highest sounding key the loudest in its channel.
  - Integer division truncates toward zero, exactly like the reference
    rendering; tests pin the arithmetic.
*/

/// Left and right 16-bit samples.
pub type StereoFrame = [i16; 2];

/// Fold `sample` into `slot` at half weight after halving what is there.
#[inline]
pub fn mix_decaying(slot: &mut i16, sample: i16) {
    *slot /= 2;
    *slot += sample / 2;
}

/// Little-endian bytes of a stereo frame: left then right.
#[inline]
pub fn frame_to_le_bytes(frame: StereoFrame) -> [u8; 4] {
    let [l0, l1] = frame[0].to_le_bytes();
    let [r0, r1] = frame[1].to_le_bytes();
    [l0, l1, r0, r1]
}
