//! Butterworth low-pass design and zero-phase filtering

use mq_core::{MqError, MqResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Immutable low-pass filter specification
///
/// Built through [`FilterSpec::new`], which rejects a cutoff outside `(0, 1)`
/// or a non-positive sampling rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterSpec {
    order: usize,
    cutoff_fraction: f64,
    sampling_rate: f64,
}

impl FilterSpec {
    /// Filter order used by the pipeline
    pub const ORDER: usize = 4;

    /// Create a fourth-order specification
    ///
    /// `cutoff_fraction` is relative to the Nyquist frequency
    /// (`sampling_rate / 2`).
    pub fn new(cutoff_fraction: f64, sampling_rate: f64) -> MqResult<Self> {
        validate_parameters(cutoff_fraction, sampling_rate)?;
        Ok(Self {
            order: Self::ORDER,
            cutoff_fraction,
            sampling_rate,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cutoff_fraction(&self) -> f64 {
        self.cutoff_fraction
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Cutoff in the units of `sampling_rate`
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_fraction * self.sampling_rate / 2.0
    }
}

/// Feedforward (`b`) and feedback (`a`) coefficients, `a[0] == 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl FilterCoefficients {
    /// Wrap raw coefficient vectors, normalizing by `a[0]`
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> MqResult<Self> {
        if b.is_empty() || a.is_empty() {
            return Err(MqError::invalid_parameter(
                "coefficients",
                "filter coefficients cannot be empty",
            ));
        }
        let a0 = a[0];
        if !a0.is_finite() || a0.abs() < 1e-30 {
            return Err(MqError::invalid_parameter(
                "coefficients",
                "leading feedback coefficient cannot be zero",
            ));
        }
        Ok(Self {
            b: b.iter().map(|v| v / a0).collect(),
            a: a.iter().map(|v| v / a0).collect(),
        })
    }

    pub fn feedforward(&self) -> &[f64] {
        &self.b
    }

    pub fn feedback(&self) -> &[f64] {
        &self.a
    }

    /// Length of the longer coefficient vector
    pub fn taps(&self) -> usize {
        self.b.len().max(self.a.len())
    }

    /// Gain at zero frequency, `sum(b) / sum(a)`
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Both vectors zero-padded to [`taps`](Self::taps)
    fn padded(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.taps();
        let mut b = self.b.clone();
        let mut a = self.a.clone();
        b.resize(n, 0.0);
        a.resize(n, 0.0);
        (b, a)
    }
}

/// Derives Butterworth low-pass coefficients
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterDesigner;

impl FilterDesigner {
    /// Design the filter described by `spec`
    pub fn design(spec: &FilterSpec) -> MqResult<FilterCoefficients> {
        Self::butterworth_lowpass(spec.order(), spec.cutoff_fraction(), spec.sampling_rate())
    }

    /// Digital Butterworth low-pass of arbitrary order
    ///
    /// Analog prototype poles are pre-warped to the cutoff, scaled, mapped
    /// through the bilinear transform and expanded to polynomials. All `N`
    /// zeros sit at `z = -1`.
    pub fn butterworth_lowpass(
        order: usize,
        cutoff_fraction: f64,
        sampling_rate: f64,
    ) -> MqResult<FilterCoefficients> {
        if order == 0 {
            return Err(MqError::invalid_parameter("order", "must be at least 1"));
        }
        validate_parameters(cutoff_fraction, sampling_rate)?;

        // Normalized design at fs = 2, so the Nyquist frequency is 1
        let fs2 = Complex64::new(4.0, 0.0);
        let warped = 4.0 * (PI * cutoff_fraction / 2.0).tan();
        let n = order as f64;

        let analog_poles: Vec<Complex64> = (0..order)
            .map(|k| {
                let m = 1.0 - n + 2.0 * k as f64;
                -Complex64::from_polar(1.0, PI * m / (2.0 * n)) * warped
            })
            .collect();

        let digital_poles: Vec<Complex64> = analog_poles
            .iter()
            .map(|&p| (fs2 + p) / (fs2 - p))
            .collect();
        let digital_zeros = vec![Complex64::new(-1.0, 0.0); order];

        let denom: Complex64 = analog_poles.iter().map(|&p| fs2 - p).product();
        let gain = warped.powi(order as i32) * (Complex64::new(1.0, 0.0) / denom).re;

        let b = poly(&digital_zeros).iter().map(|c| c.re * gain).collect();
        let a = poly(&digital_poles).iter().map(|c| c.re).collect();

        FilterCoefficients::new(b, a)
    }
}

fn validate_parameters(cutoff_fraction: f64, sampling_rate: f64) -> MqResult<()> {
    if !(cutoff_fraction > 0.0 && cutoff_fraction < 1.0) {
        return Err(MqError::invalid_parameter(
            "cutoff_fraction",
            format!("{} is outside (0, 1)", cutoff_fraction),
        ));
    }
    if !(sampling_rate > 0.0 && sampling_rate.is_finite()) {
        return Err(MqError::invalid_parameter(
            "sampling_rate",
            format!("{} is not a positive finite rate", sampling_rate),
        ));
    }
    Ok(())
}

/// Monic polynomial with the given roots, highest power first
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}

/// Forward-backward application of a designed filter
///
/// The signal is extended at both ends by odd reflection about its end
/// points, each pass starts from the filter's steady state for its first
/// sample, and the extension is trimmed afterwards. Output sample `i` is
/// aligned with input sample `i`.
#[derive(Debug, Clone)]
pub struct ZeroPhaseFilter {
    coefficients: FilterCoefficients,
}

impl ZeroPhaseFilter {
    pub fn new(coefficients: FilterCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Edge extension length, `3 * max(len(b), len(a))`
    pub fn pad_len(&self) -> usize {
        3 * self.coefficients.taps()
    }

    /// Filter `signal`; it must be longer than [`pad_len`](Self::pad_len)
    pub fn apply(&self, signal: &[f64]) -> MqResult<Vec<f64>> {
        let pad = self.pad_len();
        let n = signal.len();
        if n <= pad {
            return Err(MqError::InsufficientSamples {
                required: pad,
                actual: n,
            });
        }

        let (b, a) = self.coefficients.padded();
        let zi = steady_state(&b, &a);

        let extended = odd_extend(signal, pad);

        let x0 = extended[0];
        let init: Vec<f64> = zi.iter().map(|z| z * x0).collect();
        let mut forward = lfilter(&b, &a, &extended, &init);

        forward.reverse();
        let y0 = forward[0];
        let init: Vec<f64> = zi.iter().map(|z| z * y0).collect();
        let mut backward = lfilter(&b, &a, &forward, &init);
        backward.reverse();

        Ok(backward[pad..pad + n].to_vec())
    }
}

/// Apply the filter in `coefficients` to `signal` with zero phase
pub fn filtfilt(coefficients: &FilterCoefficients, signal: &[f64]) -> MqResult<Vec<f64>> {
    ZeroPhaseFilter::new(coefficients.clone()).apply(signal)
}

/// Odd reflection about both end points; requires `signal.len() > pad`
fn odd_extend(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i]));
    out.extend_from_slice(signal);
    out.extend((1..=pad).map(|i| 2.0 * last - signal[n - 1 - i]));
    out
}

/// Transposed direct form II state for a unit step in steady state
///
/// `zi[i] = sum_{j > i} (b[j] - a[j] * G)` with `G` the DC gain.
fn steady_state(b: &[f64], a: &[f64]) -> Vec<f64> {
    let taps = b.len();
    if taps < 2 {
        return Vec::new();
    }
    let gain = b.iter().sum::<f64>() / a.iter().sum::<f64>();
    let mut zi = vec![0.0; taps - 1];
    let mut acc = 0.0;
    for i in (0..taps - 1).rev() {
        acc += b[i + 1] - a[i + 1] * gain;
        zi[i] = acc;
    }
    zi
}

/// Single causal pass, transposed direct form II; `b` and `a` share a length
fn lfilter(b: &[f64], a: &[f64], x: &[f64], zi: &[f64]) -> Vec<f64> {
    let order = b.len() - 1;
    let mut z = zi.to_vec();
    let mut y = Vec::with_capacity(x.len());

    for &xn in x {
        let yn = b[0] * xn + z.first().copied().unwrap_or(0.0);
        for i in 0..order {
            let carry = if i + 1 < order { z[i + 1] } else { 0.0 };
            z[i] = b[i + 1] * xn - a[i + 1] * yn + carry;
        }
        y.push(yn);
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn reference_spec() -> FilterSpec {
        FilterSpec::new(0.1, 1.0).unwrap()
    }

    #[test]
    fn test_spec_rejects_bad_parameters() {
        for cutoff in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let err = FilterSpec::new(cutoff, 1.0).unwrap_err();
            assert!(matches!(
                err,
                MqError::InvalidParameter {
                    parameter: "cutoff_fraction",
                    ..
                }
            ));
        }
        for rate in [0.0, -1.0, f64::INFINITY] {
            let err = FilterSpec::new(0.1, rate).unwrap_err();
            assert!(matches!(
                err,
                MqError::InvalidParameter {
                    parameter: "sampling_rate",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_designer_rejects_bad_parameters() {
        assert!(FilterDesigner::butterworth_lowpass(4, 1.2, 1.0).is_err());
        assert!(FilterDesigner::butterworth_lowpass(4, 0.1, 0.0).is_err());
        assert!(FilterDesigner::butterworth_lowpass(0, 0.1, 1.0).is_err());
    }

    #[test]
    fn test_fourth_order_shape() {
        let coeffs = FilterDesigner::design(&reference_spec()).unwrap();
        assert_eq!(coeffs.feedforward().len(), 5);
        assert_eq!(coeffs.feedback().len(), 5);
        assert_eq!(coeffs.feedback()[0], 1.0);
        assert_approx_eq!(coeffs.dc_gain(), 1.0, 1e-9);
    }

    #[test]
    fn test_matches_reference_coefficients() {
        // 4th-order Butterworth low-pass at 0.2 x Nyquist
        let coeffs = FilterDesigner::design(&FilterSpec::new(0.2, 1.0).unwrap()).unwrap();
        let b = [
            4.824343357716228e-3,
            1.9297373430864913e-2,
            2.894606014629737e-2,
            1.9297373430864913e-2,
            4.824343357716228e-3,
        ];
        let a = [
            1.0,
            -2.3695130071820376,
            2.31398841441588,
            -1.0546654058785676,
            0.1873794923681849,
        ];
        for (got, want) in coeffs.feedforward().iter().zip(b) {
            assert_approx_eq!(*got, want, 1e-12);
        }
        for (got, want) in coeffs.feedback().iter().zip(a) {
            assert_approx_eq!(*got, want, 1e-10);
        }
    }

    #[test]
    fn test_second_order_matches_bilinear_formula() {
        // closed form for N = 2: k = tan(pi * wn / 2)
        let wn = 0.25;
        let k = (PI * wn / 2.0).tan();
        let norm = k * k + std::f64::consts::SQRT_2 * k + 1.0;
        let coeffs = FilterDesigner::butterworth_lowpass(2, wn, 1.0).unwrap();

        assert_approx_eq!(coeffs.feedforward()[0], k * k / norm, 1e-12);
        assert_approx_eq!(coeffs.feedforward()[1], 2.0 * k * k / norm, 1e-12);
        assert_approx_eq!(coeffs.feedback()[1], 2.0 * (k * k - 1.0) / norm, 1e-12);
        assert_approx_eq!(
            coeffs.feedback()[2],
            (k * k - std::f64::consts::SQRT_2 * k + 1.0) / norm,
            1e-12
        );
    }

    #[test]
    fn test_design_is_deterministic() {
        let first = FilterDesigner::design(&reference_spec()).unwrap();
        let second = FilterDesigner::design(&reference_spec()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_rate_does_not_change_normalized_design() {
        let at_one = FilterDesigner::design(&FilterSpec::new(0.2, 1.0).unwrap()).unwrap();
        let at_hundred = FilterDesigner::design(&FilterSpec::new(0.2, 100.0).unwrap()).unwrap();
        assert_eq!(at_one, at_hundred);
        assert_approx_eq!(FilterSpec::new(0.2, 100.0).unwrap().cutoff_hz(), 10.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let filter = ZeroPhaseFilter::new(FilterDesigner::design(&reference_spec()).unwrap());
        assert_eq!(filter.pad_len(), 15);

        let err = filter.apply(&[1.0; 15]).unwrap_err();
        assert_eq!(
            err,
            MqError::InsufficientSamples {
                required: 15,
                actual: 15
            }
        );
        assert_eq!(filter.apply(&[1.0; 16]).unwrap().len(), 16);
    }

    #[test]
    fn test_constant_signal_is_preserved() {
        let coeffs = FilterDesigner::design(&reference_spec()).unwrap();
        let signal = vec![42.0; 200];
        let filtered = filtfilt(&coeffs, &signal).unwrap();
        assert_eq!(filtered.len(), signal.len());
        for v in filtered {
            assert_approx_eq!(v, 42.0, 1e-6);
        }
    }

    #[test]
    fn test_high_frequency_is_attenuated() {
        let coeffs = FilterDesigner::design(&reference_spec()).unwrap();
        // alternating sign sits at Nyquist
        let signal: Vec<f64> = (0..400)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let filtered = filtfilt(&coeffs, &signal).unwrap();
        let interior_max = filtered[50..350]
            .iter()
            .fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!(interior_max < 5e-3, "residual {}", interior_max);
    }

    #[test]
    fn test_no_phase_shift_on_slow_sinusoid() {
        let coeffs = FilterDesigner::design(&reference_spec()).unwrap();
        let period = 200.0;
        let signal: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * i as f64 / period).sin())
            .collect();
        let filtered = filtfilt(&coeffs, &signal).unwrap();

        // interior samples track the input closely in phase and amplitude
        for i in 100..900 {
            assert_approx_eq!(filtered[i], signal[i], 0.02);
        }
    }

    #[test]
    fn test_odd_extension() {
        let ext = odd_extend(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn test_steady_state_holds_constant_output() {
        let coeffs = FilterDesigner::design(&reference_spec()).unwrap();
        let (b, a) = coeffs.padded();
        let zi = steady_state(&b, &a);
        let init: Vec<f64> = zi.iter().map(|z| z * 3.0).collect();
        let out = lfilter(&b, &a, &[3.0; 20], &init);
        for v in out {
            assert_approx_eq!(v, 3.0, 1e-9);
        }
    }
}
