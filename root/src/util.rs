use crate::router::INF;
use std::cmp::min;

/// Compares whether a < b mod 65536
///
/// # Arguments
///
/// * `a`: First one
/// * `b`: Second one
///
/// returns: bool
///
/// # Examples
///
/// ```
/// assert!(root_rib::util::seqno_less_than(5, 10000));
/// assert!(root_rib::util::seqno_less_than(60000, 61000));
/// assert!(root_rib::util::seqno_less_than(65535, 2));
///
/// assert!(!root_rib::util::seqno_less_than(20000, 61000));
/// assert!(!root_rib::util::seqno_less_than(7, 7));
/// ```
pub fn seqno_less_than(a: u16, b: u16) -> bool {
    let x = b.wrapping_sub(a);
    0 < x && x < 32768
}

/// Shortcut for increment mod 2^16
pub fn increment_by(x: u16, y: u16) -> u16 {
    x.wrapping_add(y)
}

/// Adds metric components, saturating at INF
pub fn sum_inf(cost_a: u16, cost_b: u16) -> u16 {
    min(cost_a as u32 + cost_b as u32, INF as u32) as u16
}

/// Whether a timestamp taken at `time` is more than `delay` seconds older than `now`
pub fn older_than(time: u64, now: u64, delay: u64) -> bool {
    time.saturating_add(delay) < now
}

/// Translates the additive metric into the kernel's coarser scale
pub fn metric_to_kernel(metric: u16, bias: u32, kernel_infinity: u32) -> u32 {
    if metric >= INF {
        kernel_infinity
    } else {
        min((metric as u32).div_ceil(256) + bias, kernel_infinity)
    }
}
