//! SARIMA model specification.

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// A `(p,d,q)(P,D,Q)[s]` seasonal ARIMA specification.
///
/// `p`/`d`/`q` are the non-seasonal autoregressive, differencing, and
/// moving-average orders; `sp`/`sd`/`sq` their seasonal counterparts at
/// period `period`. Specifications are plain values: generated, fitted,
/// ranked, and discarded — never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SarimaSpec {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order (P).
    pub sp: usize,
    /// Seasonal differencing order (D).
    pub sd: usize,
    /// Seasonal MA order (Q).
    pub sq: usize,
    /// Seasonal period (12 for monthly data).
    pub period: usize,
}

impl SarimaSpec {
    pub fn new(p: usize, d: usize, q: usize, sp: usize, sd: usize, sq: usize, period: usize) -> Self {
        Self { p, d, q, sp, sd, sq, period }
    }

    /// The cap-relevant complexity: `p + q + P + Q`.
    ///
    /// Differencing orders are deliberately excluded — they consume
    /// observations but add no estimated coefficients.
    pub fn complexity(&self) -> usize {
        self.p + self.q + self.sp + self.sq
    }

    /// Number of coefficients estimated by the optimizer.
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q + self.sp + self.sq
    }

    /// Observations consumed by differencing before estimation starts.
    pub fn differencing_lags(&self) -> usize {
        self.d + self.sd * self.period
    }

    /// Burn-in on the differenced scale before residuals are defined.
    pub fn burn_in(&self) -> usize {
        let ar_span = self.p + self.sp * self.period;
        let ma_span = self.q + self.sq * self.period;
        ar_span.max(ma_span)
    }

    /// Minimum series length for which this specification is estimable with
    /// enough degrees of freedom for the bias-corrected criterion.
    pub fn min_observations(&self) -> usize {
        // k coefficients + variance, and AICc needs n_eff > k_total + 1.
        let k_total = self.num_coefficients() + 1;
        self.differencing_lags() + self.burn_in() + k_total + 2
    }
}

impl fmt::Display for SarimaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.sp, self.sd, self.sq, self.period
        )
    }
}

impl FromStr for SarimaSpec {
    type Err = SearchError;

    /// Parse the `(p,d,q)(P,D,Q)[s]` rendering, as persisted in result
    /// tables.
    fn from_str(s: &str) -> Result<Self, SearchError> {
        let err = || SearchError::FormatError(format!("bad model string: {s}"));
        let s = s.trim();
        let rest = s.strip_prefix('(').ok_or_else(err)?;
        let (nonseasonal, rest) = rest.split_once(')').ok_or_else(err)?;
        let rest = rest.strip_prefix('(').ok_or_else(err)?;
        let (seasonal, rest) = rest.split_once(')').ok_or_else(err)?;
        let period = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(err)?;

        let parse3 = |part: &str| -> Result<(usize, usize, usize), SearchError> {
            let nums: Vec<usize> = part
                .split(',')
                .map(|x| x.trim().parse::<usize>())
                .collect::<Result<_, _>>()
                .map_err(|_| err())?;
            match nums[..] {
                [a, b, c] => Ok((a, b, c)),
                _ => Err(err()),
            }
        };

        let (p, d, q) = parse3(nonseasonal)?;
        let (sp, sd, sq) = parse3(seasonal)?;
        let period = period.trim().parse::<usize>().map_err(|_| err())?;
        Ok(SarimaSpec::new(p, d, q, sp, sd, sq, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_human_readable_form() {
        let spec = SarimaSpec::new(2, 1, 0, 0, 1, 1, 12);
        assert_eq!(spec.to_string(), "(2,1,0)(0,1,1)[12]");
    }

    #[test]
    fn round_trips_through_string_form() {
        let spec = SarimaSpec::new(3, 0, 2, 1, 2, 0, 12);
        let parsed: SarimaSpec = spec.to_string().parse().unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("(1,1)(0,1,1)[12]".parse::<SarimaSpec>().is_err());
        assert!("(1,1,1)(0,1,1)".parse::<SarimaSpec>().is_err());
        assert!("1,1,1,0,1,1,12".parse::<SarimaSpec>().is_err());
    }

    #[test]
    fn complexity_excludes_differencing() {
        let spec = SarimaSpec::new(2, 1, 1, 1, 3, 2, 12);
        assert_eq!(spec.complexity(), 6);
        assert_eq!(spec.num_coefficients(), 6);
    }

    #[test]
    fn min_observations_grows_with_orders() {
        let small = SarimaSpec::new(0, 0, 0, 0, 1, 0, 12);
        let large = SarimaSpec::new(3, 1, 3, 2, 1, 2, 12);
        assert!(large.min_observations() > small.min_observations());
        // Seasonal AR at period 12 dominates the burn-in.
        assert_eq!(large.burn_in(), 3 + 2 * 12);
    }
}
