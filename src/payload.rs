//! Raw coordinate payload handling.
//!
//! The trajectory API answers with a bare little-endian `f32` stream laid
//! out as `frame × atom × xyz`. Nothing in the bytes describes the layout;
//! frame and atom counts travel out of band with the request.

use crate::error::DecodeError;

const F32_BYTES: usize = 4;

/// Reinterpret little-endian bytes as `f32` coordinates.
///
/// The input need not be 4-byte aligned. Fails when the byte length is not
/// a multiple of 4.
pub fn payload_from_bytes(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if bytes.len() % F32_BYTES != 0 {
        return Err(DecodeError::PayloadBytes { len: bytes.len() });
    }
    let mut values: Vec<f32> = bytemuck::pod_collect_to_vec(bytes);
    if cfg!(target_endian = "big") {
        for v in &mut values {
            *v = f32::from_bits(v.to_bits().swap_bytes());
        }
    }
    Ok(values)
}

/// Atoms per frame implied by a payload holding `frames` frames.
///
/// Integer division: trailing values that do not fill a whole atom in every
/// frame are ignored. A frame count too large to address is a
/// [`DecodeError::TopologyMismatch`].
pub fn atoms_per_frame(
    payload_len: usize,
    frames: usize,
) -> Result<usize, DecodeError> {
    if frames == 0 {
        return Ok(0);
    }
    frames
        .checked_mul(3)
        .map(|values_per_atom| payload_len / values_per_atom)
        .ok_or_else(|| {
            DecodeError::mismatch(format!(
                "{frames} frames exceed the addressable payload size"
            ))
        })
}
