//! Admittances of the passive components: Resistor, Inductor, Capacitor.
//!
//! All three stamp the same way into the MNA matrix; they only differ in the
//! admittance they present at a given excitation frequency.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Admittance of a resistor, `1 / R`.
pub fn resistor_admittance(resistance: Complex64) -> Complex64 {
    resistance.inv()
}

/// Admittance of an inductor at `frequency` Hz.
///
/// At DC an ideal inductor is a short. It is approximated by the finite
/// admittance `1 / (epsilon * L)`, which grows without bound as `epsilon`
/// goes to zero.
pub fn inductor_admittance(inductance: Complex64, frequency: f64, epsilon: f64) -> Complex64 {
    if frequency == 0.0 {
        (inductance * epsilon).inv()
    } else {
        (Complex64::i() * 2.0 * PI * frequency * inductance).inv()
    }
}

/// Admittance of a capacitor at `frequency` Hz.
///
/// At DC an ideal capacitor is open. It is approximated by the vanishing
/// admittance `epsilon * C`.
pub fn capacitor_admittance(capacitance: Complex64, frequency: f64, epsilon: f64) -> Complex64 {
    if frequency == 0.0 {
        capacitance * epsilon
    } else {
        Complex64::i() * 2.0 * PI * frequency * capacitance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistor_admittance() {
        let y = resistor_admittance(Complex64::new(5.0, 0.0));
        assert_relative_eq!(y.re, 0.2);
        assert_eq!(y.im, 0.0);
    }

    #[test]
    fn test_inductor_admittance() {
        // 1 / (j * 2pi * 50 * 0.1) = -j / 31.4159...
        let y = inductor_admittance(Complex64::new(0.1, 0.0), 50.0, 1e-9);
        assert_relative_eq!(y.re, 0.0, epsilon = 1e-15);
        assert_relative_eq!(y.im, -1.0 / (2.0 * PI * 5.0), max_relative = 1e-12);

        // Near-short at DC
        let y_dc = inductor_admittance(Complex64::new(0.1, 0.0), 0.0, 1e-9);
        assert_relative_eq!(y_dc.re, 1e10, max_relative = 1e-12);
    }

    #[test]
    fn test_capacitor_admittance() {
        let y = capacitor_admittance(Complex64::new(1e-6, 0.0), 1000.0, 1e-9);
        assert_relative_eq!(y.im, 2.0 * PI * 1e-3, max_relative = 1e-12);

        // Near-open at DC
        let y_dc = capacitor_admittance(Complex64::new(1e-6, 0.0), 0.0, 1e-9);
        assert_relative_eq!(y_dc.re, 1e-15, max_relative = 1e-12);
        assert_eq!(y_dc.im, 0.0);
    }
}
