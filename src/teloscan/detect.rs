use crate::teloscan::candidate::{find_repeat_runs, RepeatRun};
use crate::utils::Result;
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqEnd {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Params {
    pub motifs: Vec<String>,
    pub min_repeats: usize,
    pub window: usize,
    pub max_offset: Option<usize>,
}

impl Params {
    pub fn new(
        motifs: Vec<String>,
        min_repeats: usize,
        window: usize,
        max_offset: Option<usize>,
    ) -> Result<Self> {
        let params = Params {
            motifs: motifs.into_iter().map(|m| m.to_uppercase()).collect(),
            min_repeats,
            window,
            max_offset,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.motifs.is_empty() {
            return Err("At least one motif is required".to_string());
        }
        if self.motifs.iter().any(|m| m.is_empty()) {
            return Err("Motifs cannot be empty strings".to_string());
        }
        if self.min_repeats < 1 {
            return Err("Minimum repeat count must be at least 1".to_string());
        }
        if self.window < 1 {
            return Err("Window size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A winning repeat run translated into absolute sequence coordinates
/// (1-based, inclusive on both sides).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelomereMatch {
    pub motif: String,
    pub start: usize,
    pub end: usize,
    pub seq: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub left: Option<TelomereMatch>,
    pub right: Option<TelomereMatch>,
}

impl Detection {
    pub fn num_ends(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }
}

/// Evaluates both sequence ends independently. The sequence is expected to
/// be uppercased by the caller; detection itself keeps no state.
pub fn detect(seq: &str, params: &Params) -> Detection {
    Detection {
        left: detect_end(seq, params, SeqEnd::Left),
        right: detect_end(seq, params, SeqEnd::Right),
    }
}

pub fn detect_end(seq: &str, params: &Params, end: SeqEnd) -> Option<TelomereMatch> {
    let bases = seq.as_bytes();
    let window_len = params.window.min(bases.len());
    let offset = match end {
        SeqEnd::Left => 0,
        SeqEnd::Right => bases.len() - window_len,
    };
    let region = &bases[offset..offset + window_len];

    let mut runs = Vec::new();
    for (motif_index, motif) in params.motifs.iter().enumerate() {
        runs.extend(find_repeat_runs(region, motif.as_bytes(), motif_index));
    }

    runs.retain(|r| r.repeats >= params.min_repeats);
    if let Some(max_offset) = params.max_offset {
        runs.retain(|r| match end {
            SeqEnd::Left => r.start <= max_offset,
            SeqEnd::Right => window_len - r.end <= max_offset,
        });
    }

    let best = select_best(runs)?;
    let motif = &params.motifs[best.motif_index];
    Some(TelomereMatch {
        motif: motif.clone(),
        start: offset + best.start + 1,
        end: offset + best.end,
        seq: motif.repeat(best.repeats),
    })
}

// Winner priority: most repeats, then longest match (motifs may differ in
// length), then earliest start, then first motif in the supplied order.
// min_by_key keeps the first minimum, so the result is deterministic.
fn select_best(runs: Vec<RepeatRun>) -> Option<RepeatRun> {
    runs.into_iter().min_by_key(|r| {
        (
            Reverse(r.repeats),
            Reverse(r.match_len()),
            r.start,
            r.motif_index,
        )
    })
}
