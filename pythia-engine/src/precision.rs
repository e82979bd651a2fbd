//! Arbitrary-precision decimal digits of π.
//!
//! Rabinowitz–Wagon spigot: streams decimal digits of π using only
//! integer arithmetic, so the expansion is exact to any requested length.

/// First `count` decimal digits of π as digit values: `[3, 1, 4, 1, 5, ...]`.
pub fn pi_digits(count: usize) -> Vec<u8> {
    if count == 0 {
        return Vec::new();
    }

    // Guard iterations cover the held-back predigit and 9-runs that
    // straddle the cut (π has a six-nine run at position 762)
    let iterations = count + 10;
    let len = iterations * 10 / 3 + 1;
    let mut remainders = vec![2u64; len];

    let mut digits: Vec<u8> = Vec::with_capacity(iterations + 1);
    let mut predigit = 0u8;
    let mut nines = 0usize;

    for _ in 0..iterations {
        let mut quotient = 0u64;
        for i in (1..=len).rev() {
            let x = 10 * remainders[i - 1] + quotient * i as u64;
            remainders[i - 1] = x % (2 * i as u64 - 1);
            quotient = x / (2 * i as u64 - 1);
        }
        remainders[0] = quotient % 10;
        quotient /= 10;

        if quotient == 9 {
            nines += 1;
        } else if quotient == 10 {
            digits.push(predigit + 1);
            for _ in 0..nines {
                digits.push(0);
            }
            predigit = 0;
            nines = 0;
        } else {
            digits.push(predigit);
            predigit = quotient as u8;
            for _ in 0..nines {
                digits.push(9);
            }
            nines = 0;
        }
    }
    digits.push(predigit);

    // The first emitted digit is a spurious zero placeholder
    digits.remove(0);
    digits.truncate(count);
    digits
}

/// π rendered to `length` significant decimal digits (rounded half-up,
/// as a decimal printer would), then parsed back as the nearest f64 —
/// the float approximation of the arbitrary-precision expansion.
pub fn pi_to_f64(length: usize) -> f64 {
    let length = length.max(1);
    let mut digits = pi_digits(length + 1);
    let round_up = digits.pop().unwrap_or(0) >= 5;
    if round_up {
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                break;
            }
        }
    }

    let mut s = String::with_capacity(digits.len() + 1);
    s.push((b'0' + digits[0]) as char);
    if digits.len() > 1 {
        s.push('.');
        for &d in &digits[1..] {
            s.push((b'0' + d) as char);
        }
    }
    // The rendered digits are always a valid decimal literal
    s.parse().unwrap_or(std::f64::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefix() {
        // 3.14159265358979323846...
        let expected: &[u8] = &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3, 2, 3, 8, 4, 6];
        assert_eq!(pi_digits(21), expected);
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(pi_digits(1), vec![3]);
        assert_eq!(pi_digits(50).len(), 50);
        assert!(pi_digits(0).is_empty());
    }

    #[test]
    fn test_longer_run_stays_consistent() {
        // A longer request must reproduce the shorter one as a prefix
        let short = pi_digits(30);
        let long = pi_digits(120);
        assert_eq!(&long[..30], &short[..]);
    }

    #[test]
    fn test_pi_to_f64_converges() {
        // Any request past f64 precision lands exactly on the constant
        assert_eq!(pi_to_f64(17), std::f64::consts::PI);
        assert_eq!(pi_to_f64(60), std::f64::consts::PI);

        // Short expansions round half-up: 3.1415(9…) → 3.1416
        assert_eq!(pi_to_f64(1), 3.0);
        assert!((pi_to_f64(3) - 3.14).abs() < 1e-12);
        assert!((pi_to_f64(5) - 3.1416).abs() < 1e-12);
    }
}
