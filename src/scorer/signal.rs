//! Small numeric helpers over frame-indexed series.

#[inline(always)]
pub fn mean(xs: &[f32]) -> f32 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f32>() / xs.len() as f32
}

/// Population standard deviation.
pub fn std_dev(xs: &[f32]) -> f32 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f32>() / xs.len() as f32;
    var.sqrt()
}

/// Pearson correlation, `None` if either side is flat.
pub fn pearson(a: &[f32], b: &[f32]) -> Option<f32> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for i in 0..n {
        let da = a[i] - ma;
        let db = b[i] - mb;
        cov += da * db;
        va += da * da;
        vb += db * db;
    }
    if va <= f32::EPSILON || vb <= f32::EPSILON {
        return None;
    }
    Some((cov / (va.sqrt() * vb.sqrt())).clamp(-1.0, 1.0))
}

/// Trend of `ys` over times `ts` from a local straight-line fit.
///
/// Each sample is fitted over `window` consecutive samples, centered where possible and
/// shifted inward at the edges, so a constant-velocity series is its own trend end to end.
pub fn linear_trend(ts: &[f32], ys: &[f32], window: usize) -> Vec<f32> {
    let n = ts.len().min(ys.len());
    let w = window.max(1).min(n);
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(w / 2).min(n - w);
            let (t, y) = (&ts[lo..lo + w], &ys[lo..lo + w]);
            let (mt, my) = (mean(t), mean(y));
            let mut sxx = 0.0;
            let mut sxy = 0.0;
            for k in 0..w {
                let dt = t[k] - mt;
                sxx += dt * dt;
                sxy += dt * (y[k] - my);
            }
            if sxx <= f32::EPSILON {
                my
            } else {
                my + sxy / sxx * (ts[i] - mt)
            }
        })
        .collect()
}

/// Lag `k` of `b` relative to `a`: pairs `a[i]` with `b[i + k]`, skipping gaps on either side.
pub fn lagged_pairs(a: &[Option<f32>], b: &[Option<f32>], lag: i32) -> (Vec<f32>, Vec<f32>) {
    let n = a.len().min(b.len());
    let k = lag.unsigned_abs() as usize;
    if k >= n {
        return (Vec::new(), Vec::new());
    }
    let (a, b) = if lag >= 0 {
        (&a[..n - k], &b[k..n])
    } else {
        (&a[k..n], &b[..n - k])
    };
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_trend_follows_straight_motion() {
        let ts: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let ys: Vec<f32> = ts.iter().map(|t| 0.5 + 0.03 * t).collect();
        for (trend, y) in linear_trend(&ts, &ys, 5).iter().zip(&ys) {
            assert!((trend - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_linear_trend_uses_time_not_position() {
        // Sample at t=10 after a gap still lies on the same line
        let ts = [0.0, 1.0, 2.0, 10.0];
        let ys = [0.0, 2.0, 4.0, 20.0];
        for (trend, y) in linear_trend(&ts, &ys, 3).iter().zip(&ys) {
            assert!((trend - y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pearson_flat_is_none() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lagged_pairs_skip_gaps() {
        let a = [Some(1.0), Some(2.0), None, Some(4.0)];
        let b = [Some(0.0), Some(1.0), Some(2.0), Some(3.0)];
        let (x, y) = lagged_pairs(&a, &b, 1);
        assert_eq!(x, vec![1.0, 2.0]);
        assert_eq!(y, vec![1.0, 2.0]);
        let (x, y) = lagged_pairs(&a, &b, -2);
        assert_eq!(x, vec![4.0]);
        assert_eq!(y, vec![1.0]);
        assert_eq!(lagged_pairs(&a, &b, 4), (vec![], vec![]));
    }
}
