//! Linear crossfade.

/*
Crossfade
=========

    crossfade(a, b, f) = a·f + b·(1 - f)

  f = 1.0  →  all A
  f = 0.5  →  half of each
  f = 0.0  →  all B

The weights always sum to one, so two full-scale inputs never exceed full
scale. The blend is linear in amplitude: with uncorrelated inputs the
perceived loudness dips around f = 0.5. That dip is inaudible for the
wet/dry blends here, where A is usually a processed copy of B.

The factor is not clamped. Values outside [0, 1] extrapolate past either
input, which callers use deliberately on the saturator's mix knob.
*/

/// Blend `a` over `b` by `f`.
#[inline]
pub fn crossfade(a: f32, b: f32, f: f32) -> f32 {
    a * f + b * (1.0 - f)
}

/// Crossfade `wet` over `dry` in place, sample by sample.
#[inline]
pub fn crossfade_in_place(wet: &mut [f32], dry: &[f32], f: f32) {
    debug_assert_eq!(wet.len(), dry.len());

    for (w, &d) in wet.iter_mut().zip(dry.iter()) {
        *w = crossfade(*w, d, f);
    }
}
