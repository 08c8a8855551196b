use crate::sweep::Size;

/// edge length the cost model is normalized to
pub const BASELINE_EDGE: f64 = 2048.0;
/// minutes a baseline-sized world needs on a single node
pub const BASELINE_MINUTES: f64 = 5.0;
/// lower bound of every estimate
pub const MINIMUM_MINUTES: u64 = 10;

/// Estimate the wall-clock budget of a run in whole minutes.
///
/// Grows with the world area relative to `BASELINE_EDGE`², shrinks with the node count and
/// is penalized by `log2(nodes)` for communication. Only used as a scheduler time limit.
pub fn estimate(nodes: u32, size: Size, _threads: u32) -> u64 {
    let nodes = f64::from(nodes.max(1));
    let area = (f64::from(size.x) / BASELINE_EDGE) * (f64::from(size.y) / BASELINE_EDGE);
    let minutes = BASELINE_MINUTES * area / nodes * nodes.log2().max(1.0);

    // float to int casts saturate, so huge worlds stay at u64::MAX
    (minutes.floor() as u64).max(MINIMUM_MINUTES)
}
