use super::density::min_pairwise_distance;

/// Scalars computed for one frame. Any field may be NaN when the frame
/// lacks the data to define it.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    /// Signal-to-noise ratio.
    pub snr: f64,
    /// Contrast ratio.
    pub cr: f64,
    /// Foreground heterogeneity.
    pub het: f64,
    /// Minimum inter-object distance.
    pub den: f64,
    /// Object count.
    pub num: f64,
}

impl FrameStats {
    /// A frame with nothing defined.
    pub fn undefined() -> Self {
        Self {
            snr: f64::NAN,
            cr: f64::NAN,
            het: f64::NAN,
            den: f64::NAN,
            num: f64::NAN,
        }
    }

    /// Density and count only; the signal statistics stay undefined.
    pub fn from_positions(positions: &[(f64, f64)]) -> Self {
        if positions.is_empty() {
            return Self::undefined();
        }
        Self {
            den: min_pairwise_distance(positions),
            num: positions.len() as f64,
            ..Self::undefined()
        }
    }

    pub fn with_signal(self, signal: SignalStats) -> Self {
        Self {
            snr: signal.snr,
            cr: signal.cr,
            het: signal.het,
            ..self
        }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::undefined()
    }
}

/// Statistics derived from the foreground and background populations.
#[derive(Clone, Copy, Debug)]
pub struct SignalStats {
    pub snr: f64,
    pub cr: f64,
    pub het: f64,
}

/// SNR, contrast ratio and heterogeneity of two intensity populations.
///
/// Each ratio is NaN when its denominator is zero, and all three are NaN
/// when either population is empty.
pub fn signal_stats(foreground: &[u8], background: &[u8]) -> SignalStats {
    let (Some((fg_mean, fg_std)), Some((bg_mean, bg_std))) =
        (mean_std(foreground), mean_std(background))
    else {
        return SignalStats {
            snr: f64::NAN,
            cr: f64::NAN,
            het: f64::NAN,
        };
    };

    let diff = (fg_mean - bg_mean).abs();
    SignalStats {
        snr: ratio(diff, bg_std.abs()),
        cr: ratio(fg_mean, bg_mean),
        het: ratio(fg_std, diff),
    }
}

/// All five frame statistics from the two populations and the frame's
/// object positions.
pub fn compute_frame_stats(
    foreground: &[u8],
    background: &[u8],
    positions: &[(f64, f64)],
) -> FrameStats {
    FrameStats::from_positions(positions).with_signal(signal_stats(foreground, background))
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { f64::NAN } else { num / den }
}

/// Mean and population standard deviation, `None` for an empty slice.
fn mean_std(values: &[u8]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some((mean, var.sqrt()))
}
