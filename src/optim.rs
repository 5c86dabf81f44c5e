//! Bounded Nelder-Mead simplex minimizer.
//!
//! Used for conditional-sum-of-squares estimation of SARIMA coefficients and
//! for Holt-Winters smoothing parameters. Derivative-free, which matters
//! here: the CSS objective is cheap but not smooth near the invertibility
//! boundary.

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex spread fell below tolerance.
    pub converged: bool,
}

/// Nelder-Mead configuration with optional box bounds.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum iterations before giving up.
    pub max_iter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tolerance: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
    /// Per-dimension `(min, max)` bounds; empty means unbounded.
    pub bounds: Vec<(f64, f64)>,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
            bounds: Vec::new(),
        }
    }
}

// Standard reflection/expansion/contraction/shrink coefficients.
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

impl NelderMead {
    /// Create a minimizer with the given box bounds.
    pub fn bounded(bounds: Vec<(f64, f64)>) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Minimize `objective` starting from `initial`.
    pub fn minimize<F>(&self, objective: F, initial: &[f64]) -> MinimizeResult
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = initial.len();
        if n == 0 {
            // Nothing to optimize: evaluate once and report.
            return MinimizeResult {
                point: vec![],
                value: objective(&[]),
                iterations: 0,
                converged: true,
            };
        }

        // Simplex of n+1 (point, value) vertices, kept sorted best-first.
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        let start = self.clamp(initial.to_vec());
        let v0 = objective(&start);
        simplex.push((start.clone(), v0));
        for i in 0..n {
            let mut vertex = start.clone();
            let step = if vertex[i].abs() > 1e-10 {
                self.initial_step * vertex[i].abs()
            } else {
                self.initial_step
            };
            vertex[i] += step;
            let vertex = self.clamp(vertex);
            let value = objective(&vertex);
            simplex.push((vertex, value));
        }

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;
            simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            let spread = simplex[n].1 - simplex[0].1;
            if spread.abs() < self.tolerance {
                converged = true;
                break;
            }

            // Centroid of all but the worst vertex.
            let mut centroid = vec![0.0; n];
            for (vertex, _) in simplex.iter().take(n) {
                for (c, x) in centroid.iter_mut().zip(vertex) {
                    *c += x;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            let worst = simplex[n].clone();
            let reflected = self.clamp(
                centroid
                    .iter()
                    .zip(&worst.0)
                    .map(|(c, w)| c + ALPHA * (c - w))
                    .collect(),
            );
            let reflected_value = objective(&reflected);

            if reflected_value < simplex[0].1 {
                // Best so far: try expanding further in the same direction.
                let expanded = self.clamp(
                    centroid
                        .iter()
                        .zip(&reflected)
                        .map(|(c, r)| c + GAMMA * (r - c))
                        .collect(),
                );
                let expanded_value = objective(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < simplex[n - 1].1 {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            // Contract towards the better of worst/reflected.
            let toward = if reflected_value < worst.1 {
                &reflected
            } else {
                &worst.0
            };
            let contracted = self.clamp(
                centroid
                    .iter()
                    .zip(toward)
                    .map(|(c, t)| c + RHO * (t - c))
                    .collect(),
            );
            let contracted_value = objective(&contracted);
            if contracted_value < worst.1.min(reflected_value) {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            // Shrink everything towards the best vertex.
            let best = simplex[0].0.clone();
            for (vertex, value) in simplex.iter_mut().skip(1) {
                for (x, b) in vertex.iter_mut().zip(&best) {
                    *x = b + SIGMA * (*x - b);
                }
                *vertex = self.clamp(vertex.clone());
                *value = objective(vertex);
            }
        }

        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let (point, value) = simplex.swap_remove(0);
        MinimizeResult {
            point,
            value,
            iterations,
            converged,
        }
    }

    fn clamp(&self, mut point: Vec<f64>) -> Vec<f64> {
        if self.bounds.is_empty() {
            return point;
        }
        for (x, &(lo, hi)) in point.iter_mut().zip(&self.bounds) {
            *x = x.clamp(lo, hi);
        }
        point
    }
}
