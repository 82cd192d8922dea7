//! Integer helpers over `i64`.
//!
//! Sums use wrapping arithmetic so overflow never panics.

pub fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

pub fn subtract(a: i64, b: i64) -> i64 {
    a.wrapping_sub(b)
}

pub fn add_slice(values: &[i64]) -> i64 {
    values.iter().fold(0, |acc, v| acc.wrapping_add(*v))
}

/// Sum of every integer between `start` and `end` inclusive, in either order
pub fn sum_range(start: i64, end: i64) -> i64 {
    let (lo, hi) = if end < start { (end, start) } else { (start, end) };
    let (lo, hi) = (i128::from(lo), i128::from(hi));
    ((lo + hi) * (hi - lo + 1) / 2) as i64
}

/// `f(1) + f(2) + ... + f(n)`, 0 when `n <= 0`
pub fn accumulate(n: i64, f: impl Fn(i64) -> i64) -> i64 {
    (1..=n).fold(0, |acc, i| acc.wrapping_add(f(i)))
}

/// nth Fibonacci number, `fibonacci(0) == 0`
pub fn fibonacci(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let (mut a, mut b) = (0_i64, 1_i64);
    for _ in 1..n {
        (a, b) = (b, a.wrapping_add(b));
    }
    b
}

pub fn triangle_number(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    sum_range(1, n)
}

/// Constrain `v` to `[min, max]`; reversed bounds are swapped
pub fn clamp(v: i64, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min > max { (max, min) } else { (min, max) };
    v.clamp(lo, hi)
}

pub fn prefix_sums(values: &[i64]) -> Vec<i64> {
    values
        .iter()
        .scan(0_i64, |running, v| {
            *running = running.wrapping_add(*v);
            Some(*running)
        })
        .collect()
}

pub fn count_evens(values: &[i64]) -> usize {
    values.iter().filter(|v| *v % 2 == 0).count()
}

/// Subtract `dec` from every value
pub fn sub_slice(values: &[i64], dec: i64) -> Vec<i64> {
    values.iter().map(|v| v.wrapping_sub(dec)).collect()
}

/// Subtract `step` from `start` `times` times; a zero step counts as 1
pub fn decrement(start: i64, times: i64, step: i64) -> i64 {
    if times <= 0 {
        return start;
    }
    let step = if step == 0 { 1 } else { step };
    start.wrapping_sub(times.wrapping_mul(step))
}

pub fn difference_abs(a: i64, b: i64) -> u64 {
    a.abs_diff(b)
}

/// Differences between adjacent elements
pub fn range_diff(values: &[i64]) -> Vec<i64> {
    values.windows(2).map(|w| w[1].wrapping_sub(w[0])).collect()
}

pub fn all_equal(values: &[i64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_subtract() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(subtract(2, 3), -1);
        assert_eq!(add_slice(&[1, 2, 3, -4]), 2);
        assert_eq!(add_slice(&[]), 0);
    }

    #[test]
    fn test_sum_range() {
        assert_eq!(sum_range(1, 10), 55);
        assert_eq!(sum_range(10, 1), 55);
        assert_eq!(sum_range(-3, 3), 0);
        assert_eq!(sum_range(7, 7), 7);
    }

    #[test]
    fn test_accumulate() {
        assert_eq!(accumulate(4, |i| i * i), 30);
        assert_eq!(accumulate(0, |i| i), 0);
        assert_eq!(accumulate(-5, |i| i), 0);
    }

    #[test]
    fn test_fibonacci() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as i64), *want);
        }
        assert_eq!(fibonacci(-1), 0);
        assert_eq!(fibonacci(90), 2_880_067_194_370_816_120);
    }

    #[test]
    fn test_triangle_number() {
        assert_eq!(triangle_number(4), 10);
        assert_eq!(triangle_number(0), 0);
        assert_eq!(triangle_number(-2), 0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2, 3, 0), 2);
        assert_eq!(clamp(9, 3, 0), 3);
    }

    #[test]
    fn test_slices() {
        assert_eq!(prefix_sums(&[1, 2, 3]), vec![1, 3, 6]);
        assert_eq!(count_evens(&[1, 2, 4, -6, 7]), 3);
        assert_eq!(sub_slice(&[5, 6], 2), vec![3, 4]);
        assert_eq!(range_diff(&[1, 4, 9]), vec![3, 5]);
        assert!(range_diff(&[]).is_empty());
        assert!(range_diff(&[1]).is_empty());
    }

    #[test]
    fn test_decrement() {
        assert_eq!(decrement(10, 3, 2), 4);
        assert_eq!(decrement(10, 3, 0), 7);
        assert_eq!(decrement(10, 0, 5), 10);
        assert_eq!(decrement(10, 2, -1), 12);
    }

    #[test]
    fn test_difference_abs_and_all_equal() {
        assert_eq!(difference_abs(3, 10), 7);
        assert_eq!(difference_abs(i64::MIN, i64::MAX), u64::MAX);
        assert!(all_equal(&[]));
        assert!(all_equal(&[4, 4, 4]));
        assert!(!all_equal(&[4, 5]));
    }
}
