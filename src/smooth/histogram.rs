use super::Error;

/// Equal-width histogram over `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets spanning their range.
    ///
    /// The maximum falls into the last bin. When every value is identical
    /// (or `values` is empty) all samples land in the first bin.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self, Error> {
        if bins == 0 {
            return Err(Error::InvalidBins);
        }

        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (lower, upper) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        let mut counts = vec![0u64; bins];
        if lower > upper {
            return Ok(Self {
                lower: 0.0,
                upper: 0.0,
                counts,
            });
        }

        let width = (upper - lower) / bins as f64;
        for &v in values.iter().filter(|v| v.is_finite()) {
            let bin = if width > 0.0 {
                (((v - lower) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[bin] += 1;
        }

        Ok(Self {
            lower,
            upper,
            counts,
        })
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.bins() as f64
    }

    /// Lower and upper edge of bin `i`.
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        (self.lower + w * i as f64, self.lower + w * (i + 1) as f64)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Index and count of the fullest bin (the first on ties).
    pub fn mode(&self) -> Option<(usize, u64)> {
        self.counts
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, c)| c > 0)
            .fold(None, |best, (i, c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((i, c)),
            })
    }
}
