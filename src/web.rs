//! Browser bindings for JavaScript viewers (feature `web`).
//!
//! The viewer fetches the topology and the binary coordinates itself and
//! passes both here. The topology arrives as a JSON array of atom records
//! (`name`, `element`, `is_protein`), since the viewer has already parsed
//! the structure. Frames come back as an `Array` of `Float32Array`, one per
//! frame, in the layout the viewer's trajectory loader expects.

use js_sys::{Array, Float32Array};
use wasm_bindgen::prelude::*;

use crate::decoder::TrajectoryDecoder;
use crate::options::DecodeOptions;
use crate::payload::payload_from_bytes;
use crate::error::DecodeError;
use crate::topology::{Atom, Topology};
use crate::trajectory::FrameMode;

/// Route panics and `log` output to the browser console. Safe to call more
/// than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // A second init fails because a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Decode a coordinate payload against a JSON atom-record topology.
///
/// `mode` is `"frames"`, `"single"` or `"projection"`; `n_frames` is only
/// read for `"frames"`. `options_toml` optionally overrides the decode
/// options. Returns `undefined` while the topology or payload is missing.
#[wasm_bindgen(js_name = decodeTrajectory)]
pub fn decode_trajectory(
    topology_json: Option<String>,
    payload: Option<Vec<u8>>,
    atom_subset: usize,
    n_frames: usize,
    mode: &str,
    options_toml: Option<String>,
) -> Result<Option<Array>, JsError> {
    let mode = parse_mode(mode, n_frames)?;
    let options = match options_toml {
        Some(text) => DecodeOptions::from_toml_str(&text)?,
        None => DecodeOptions::default(),
    };

    let topology = topology_json
        .as_deref()
        .map(topology_from_json)
        .transpose()?;
    let payload = payload.as_deref().map(payload_from_bytes).transpose()?;

    let decoded = TrajectoryDecoder::new(options).decode(
        topology.as_ref(),
        payload.as_deref(),
        atom_subset,
        mode,
    )?;

    Ok(decoded.map(|traj| {
        traj.frames()
            .iter()
            .map(|frame| Float32Array::from(frame.as_slice()))
            .collect()
    }))
}

fn topology_from_json(text: &str) -> Result<Topology, DecodeError> {
    serde_json::from_str::<Vec<Atom>>(text)
        .map(Topology::new)
        .map_err(|e| DecodeError::StructureLoad(e.to_string()))
}

fn parse_mode(mode: &str, n_frames: usize) -> Result<FrameMode, JsError> {
    match mode {
        "frames" => Ok(FrameMode::Frames(n_frames)),
        "single" => Ok(FrameMode::Single),
        "projection" => Ok(FrameMode::Projection),
        other => Err(JsError::new(&format!("unknown frame mode `{other}`"))),
    }
}
