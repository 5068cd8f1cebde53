//! Independent source values.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Phasor stored for an `ac <amplitude> <phase>` source.
///
/// The amplitude is halved (peak-to-peak to peak convention) and the phase
/// is given in degrees.
pub fn ac_phasor(amplitude: f64, phase_degrees: f64) -> Complex64 {
    Complex64::from_polar(amplitude / 2.0, phase_degrees * PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ac_phasor() {
        let v = ac_phasor(10.0, 0.0);
        assert_relative_eq!(v.re, 5.0);
        assert_relative_eq!(v.im, 0.0);

        let v = ac_phasor(2.0, 90.0);
        assert_relative_eq!(v.re, 0.0, epsilon = 1e-15);
        assert_relative_eq!(v.im, 1.0);

        let v = ac_phasor(4.0, -180.0);
        assert_relative_eq!(v.re, -2.0);
    }
}
