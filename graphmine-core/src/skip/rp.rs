//! Vitter's sequential-sampling-without-replacement skip counter, used by
//! the Random Pairing compensation step (spec §4.E) to decide, among `N`
//! outstanding "debt" slots, how many to skip before the next one is
//! certainly drawn into the `c1` (in-sample) side of the pairing.
//!
//! `n = 1` is a closed form; `n > 1` chooses between Algorithm A
//! (sequential, O(skip length)) and Algorithm D (acceptance-rejection,
//! amortized O(1)) by comparing `n · ALPHA_INV` against `N`.

use rand::Rng;

const ALPHA_INV: f64 = 13.0;

fn draw_v_prime<R: Rng + ?Sized>(coefficient: f64, rng: &mut R) -> f64 {
    (rng.gen::<f64>().ln() * coefficient).exp()
}

/// Number of records to skip before the next of the `n` remaining debt
/// slots is drawn, out of `total` outstanding candidates.
pub fn skip_records<R: Rng + ?Sized>(n: u64, total: u64, rng: &mut R) -> u64 {
    if n == 0 {
        return total;
    }
    if n == 1 {
        let v_prime = draw_v_prime(1.0, rng);
        return (total as f64 * v_prime) as u64;
    }

    let v_prime = draw_v_prime(1.0 / n as f64, rng);
    let threshold = n as f64 * ALPHA_INV;

    if threshold < total as f64 {
        algorithm_d(n, total, v_prime, rng).0
    } else {
        algorithm_a(n, total, rng)
    }
}

fn algorithm_a<R: Rng + ?Sized>(n: u64, total: u64, rng: &mut R) -> u64 {
    let mut top = (total - n) as f64;
    let mut n_real = total as f64;

    let v: f64 = rng.gen();
    let mut s: u64 = 0;

    let mut quot = (total - n) as f64 / n_real;

    while quot > v {
        s += 1;
        top -= 1.0;
        n_real -= 1.0;
        quot *= top / n_real;
    }

    s
}

fn algorithm_d<R: Rng + ?Sized>(n: u64, total: u64, v_prime: f64, rng: &mut R) -> (u64, f64) {
    let n_f = n as f64;
    let total_f = total as f64;
    let n_inv = 1.0 / n_f;
    let n_min1_inv = 1.0 / (n_f - 1.0);
    let qu1 = total_f - n_f + 1.0;

    let mut v_prime = v_prime;

    loop {
        let (x, s) = loop {
            let x = total_f * (1.0 - v_prime);
            let s = x as i64;
            if (s as f64) < qu1 {
                break (x, s);
            }
            v_prime = draw_v_prime(n_inv, rng);
        };

        let u: f64 = rng.gen();
        let y1 = ((u * total_f / qu1).ln() * n_min1_inv).exp();
        let s_f = s as f64;
        v_prime = y1 * (-x / (total_f + 1.0)) * (qu1 / (qu1 - s_f));

        if v_prime <= 1.0 {
            return (s as u64, v_prime);
        }

        let mut y2 = 1.0f64;
        let mut top = total_f - 1.0;

        let (mut bottom, limit) = if (n_f - 1.0) > s_f {
            (total_f - n_f, total_f - s_f)
        } else {
            (total_f - s_f - 1.0, qu1)
        };

        let mut t = total_f - 1.0;
        while t >= limit {
            y2 *= top / bottom;
            top -= 1.0;
            bottom -= 1.0;
            t -= 1.0;
        }

        if total_f / (total_f - x) >= y1 * (y2.ln() * n_min1_inv).exp() {
            v_prime = draw_v_prime(n_min1_inv, rng);
            return (s as u64, v_prime);
        }

        v_prime = draw_v_prime(n_inv, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn n_zero_skips_everything() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(skip_records(0, 50, &mut rng), 50);
    }

    #[test]
    fn n_one_stays_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..100 {
            let s = skip_records(1, 50, &mut rng);
            assert!(s <= 50);
        }
    }

    #[test]
    fn algorithm_a_path_stays_within_bounds() {
        // n * ALPHA_INV >= total forces algorithm A.
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..100 {
            let s = skip_records(4, 20, &mut rng);
            assert!(s <= 20);
        }
    }

    #[test]
    fn algorithm_d_path_stays_within_bounds() {
        // n * ALPHA_INV < total forces algorithm D.
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..100 {
            let s = skip_records(4, 1000, &mut rng);
            assert!(s <= 1000);
        }
    }
}
